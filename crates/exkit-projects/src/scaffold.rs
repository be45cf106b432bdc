//! End-to-end exercise scaffolding.
//!
//! [`Scaffolder::plan`] derives everything without touching the disk;
//! [`Scaffolder::execute`] then runs the three side-effecting stages in order:
//!
//! 1. generate the project ([`ProjectGenerator`])
//! 2. register `start:exNN`/`build:exNN` in the manifest
//! 3. write `README.md` into the generated directory
//!
//! The first failing stage aborts the run. Earlier stages are not rolled back.

use crate::allocator::{self, Allocation};
use crate::config::LoadedConfig;
use crate::error::{Error, Result};
use crate::generator::ProjectGenerator;
use crate::manifest::{self, ManifestUpdate};
use crate::templates::{substitute, ReadmeContext, ReadmeRenderer};
use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Side-effecting stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Manifest,
    Readme,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => write!(f, "Generating project"),
            Self::Manifest => write!(f, "Registering scripts"),
            Self::Readme => write!(f, "Writing README"),
        }
    }
}

/// Receives progress callbacks while a plan executes
pub trait ScaffoldReporter {
    /// Called right before `stage` starts
    fn on_stage(&self, _stage: Stage, _plan: &ScaffoldPlan) {}

    /// Called for tolerated anomalies, such as a reused topic
    fn on_warning(&self, _message: &str) {}
}

/// Reporter that ignores every callback
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ScaffoldReporter for NoopReporter {}

/// Everything derived for one invocation before any side effect
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldPlan {
    pub allocation: Allocation,
    pub projects_dir: Utf8PathBuf,
    pub target_dir: Utf8PathBuf,
    pub manifest_path: Utf8PathBuf,
    /// Rendered value of `start:exNN`
    pub start_command: String,
    /// Rendered value of `build:exNN`
    pub build_command: String,
    /// Existing exercises with the same topic
    pub duplicates: Vec<String>,
}

impl ScaffoldPlan {
    /// Manifest entries to insert, start first
    pub fn script_entries(&self) -> Vec<(String, String)> {
        vec![
            (self.allocation.start_script(), self.start_command.clone()),
            (self.allocation.build_script(), self.build_command.clone()),
        ]
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub plan: ScaffoldPlan,
    pub manifest: ManifestUpdate,
    pub readme_path: Utf8PathBuf,
}

/// Drives allocation, generation, manifest update and README writing
#[derive(Debug)]
pub struct Scaffolder<G> {
    config: LoadedConfig,
    generator: G,
}

impl<G: ProjectGenerator> Scaffolder<G> {
    pub fn new(config: LoadedConfig, generator: G) -> Self {
        Self { config, generator }
    }

    /// Configuration in use
    pub fn config(&self) -> &LoadedConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Allocate identifiers and render command lines for `topic`
    pub fn plan(&self, topic: &str) -> Result<ScaffoldPlan> {
        let projects_dir = self.config.projects_dir();
        let allocation = allocator::allocate(&projects_dir, topic, self.config.config.base_port)?;
        let duplicates = allocator::existing_topics(&projects_dir, topic)?;

        let port = allocation.port.to_string();
        let vars = [
            ("name", allocation.name.as_str()),
            ("port", port.as_str()),
            ("padded", allocation.padded.as_str()),
        ];
        let scripts = &self.config.config.scripts;

        Ok(ScaffoldPlan {
            target_dir: projects_dir.join(&allocation.name),
            manifest_path: self.config.manifest_path(),
            start_command: substitute(&scripts.start, &vars),
            build_command: substitute(&scripts.build, &vars),
            projects_dir,
            allocation,
            duplicates,
        })
    }

    /// Run the side-effecting stages of `plan`
    pub fn execute(
        &self,
        plan: &ScaffoldPlan,
        reporter: &dyn ScaffoldReporter,
    ) -> Result<ScaffoldReport> {
        let allocation = &plan.allocation;

        if !plan.duplicates.is_empty() {
            let message = format!(
                "Topic '{}' already used by {}",
                allocation.topic,
                plan.duplicates.join(", ")
            );
            debug!("{}", message);
            reporter.on_warning(&message);
        }

        // Load the template up front so a broken override fails before any write
        let renderer = match self.config.readme_template_path() {
            Some(path) => ReadmeRenderer::from_file(&path)?,
            None => ReadmeRenderer::new()?,
        };

        reporter.on_stage(Stage::Generate, plan);
        self.generator.generate(&allocation.name)?;
        if !plan.target_dir.is_dir() {
            return Err(Error::generated_dir_missing(plan.target_dir.as_str()));
        }
        info!("Generated {}", plan.target_dir);

        reporter.on_stage(Stage::Manifest, plan);
        let update = manifest::update_scripts(&plan.manifest_path, &plan.script_entries())?;
        info!(
            "Registered {} and {} in {}",
            allocation.start_script(),
            allocation.build_script(),
            plan.manifest_path
        );

        reporter.on_stage(Stage::Readme, plan);
        let context = ReadmeContext::new(
            allocation,
            plan.start_command.as_str(),
            plan.build_command.as_str(),
            self.config.config.runner.as_str(),
        );
        let readme_path = renderer.write_to_dir(&context, &plan.target_dir)?;
        info!("Wrote {}", readme_path);

        Ok(ScaffoldReport {
            plan: plan.clone(),
            manifest: update,
            readme_path,
        })
    }

    /// Plan and execute in one go
    pub fn run(&self, topic: &str, reporter: &dyn ScaffoldReporter) -> Result<ScaffoldReport> {
        let plan = self.plan(topic)?;
        self.execute(&plan, reporter)
    }
}
