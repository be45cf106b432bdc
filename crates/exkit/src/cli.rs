//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;

/// exkit - scaffold the next numbered exercise
#[derive(Parser, Debug)]
#[command(name = "exkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Topic of the new exercise (e.g. "routing", "two-way-binding")
    pub topic: String,

    /// Repository root holding the manifest and the projects directory
    #[arg(short, long, env = "EXKIT_ROOT", default_value = ".")]
    pub root: Utf8PathBuf,

    /// Path to exkit.yaml (default: <root>/exkit.yaml if present)
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Show what would be created without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
