//! External project generator invocation

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::templates::substitute;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Something that materializes a new sub-project directory
///
/// The production implementation shells out to [`CommandGenerator`]; tests
/// substitute a stub that creates the directory itself.
pub trait ProjectGenerator {
    /// Generate the project called `name`
    ///
    /// Blocks until generation finishes. Partial output is not cleaned up on
    /// failure.
    fn generate(&self, name: &str) -> Result<()>;
}

/// Runs an external generator program with inherited terminal streams
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    working_dir: Utf8PathBuf,
}

impl CommandGenerator {
    /// Create a generator that runs in `working_dir`
    pub fn new(config: &GeneratorConfig, working_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: working_dir.into(),
        }
    }

    /// Program name as configured
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with `{name}` substituted
    pub fn args_for(&self, name: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| substitute(arg, &[("name", name)]))
            .collect()
    }

    /// Human readable command line, for dry runs and logs
    pub fn command_line(&self, name: &str) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args_for(name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Directory the generator is started in
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }
}

impl ProjectGenerator for CommandGenerator {
    fn generate(&self, name: &str) -> Result<()> {
        let program =
            which::which(&self.program).map_err(|_| Error::generator_not_found(&self.program))?;

        debug!("Running: {} (in {})", self.command_line(name), self.working_dir);
        let status = Command::new(program)
            .args(self.args_for(name))
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if !status.success() {
            return Err(Error::generator_failed(name, status.code()));
        }

        info!("Generator finished for {}", name);
        Ok(())
    }
}
