//! # exkit-projects
//!
//! Scaffolding library behind the `exkit` CLI. Given a topic it:
//! - allocates the next `exercise-NN-<topic>` name and its port (`4200 + NN`)
//! - runs the external application generator
//! - registers `start:exNN` / `build:exNN` in the command manifest
//! - writes a README into the generated project
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use exkit_projects::{CommandGenerator, LoadedConfig, NoopReporter, Scaffolder};
//!
//! # fn example() -> exkit_projects::Result<()> {
//! let config = LoadedConfig::load(Utf8Path::new("."), None)?;
//! let generator = CommandGenerator::new(&config.config.generator, config.root.clone());
//! let scaffolder = Scaffolder::new(config, generator);
//!
//! let report = scaffolder.run("routing", &NoopReporter)?;
//! println!("{} on port {}", report.plan.allocation.name, report.plan.allocation.port);
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod config;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod scaffold;
pub mod templates;

pub use allocator::Allocation;
pub use config::{LoadedConfig, ScaffoldConfig};
pub use error::{Error, Result};
pub use generator::{CommandGenerator, ProjectGenerator};
pub use manifest::{CommandManifest, ManifestUpdate};
pub use scaffold::{
    NoopReporter, ScaffoldPlan, ScaffoldReport, ScaffoldReporter, Scaffolder, Stage,
};
