//! Configuration file loading (`exkit.yaml`)
//!
//! Every key is optional. Relative paths are resolved against the repository
//! root, so the same config works regardless of the current directory.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Configuration file names to search for in the repository root
const CONFIG_FILE_NAMES: &[&str] = &["exkit.yaml", "exkit.yml"];

/// Default port of exercise zero; exercise N is served on `4200 + N`
pub const DEFAULT_BASE_PORT: u64 = 4200;

/// Scaffolding configuration as written in `exkit.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Directory holding the `exercise-NN-*` projects
    pub projects_dir: Utf8PathBuf,

    /// JSON command manifest with a `scripts` object
    pub manifest: Utf8PathBuf,

    /// Port offset added to the sequence number
    pub base_port: u64,

    /// Task runner named in the README (`npm run start:ex01`)
    pub runner: String,

    /// External generator invocation
    pub generator: GeneratorConfig,

    /// Command lines registered in the manifest
    pub scripts: ScriptTemplates,

    /// Optional Tera template replacing the embedded README template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_template: Option<Utf8PathBuf>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            projects_dir: Utf8PathBuf::from("projects"),
            manifest: Utf8PathBuf::from("package.json"),
            base_port: DEFAULT_BASE_PORT,
            runner: "npm".to_string(),
            generator: GeneratorConfig::default(),
            scripts: ScriptTemplates::default(),
            readme_template: None,
        }
    }
}

/// External generator program and its argument templates
///
/// `{name}` in any argument is replaced by the full exercise name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "ng".to_string(),
            args: [
                "generate",
                "application",
                "{name}",
                "--routing=false",
                "--style=css",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Start/build command line templates (`{name}`, `{port}`, `{padded}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptTemplates {
    pub start: String,
    pub build: String,
}

impl Default for ScriptTemplates {
    fn default() -> Self {
        Self {
            start: "ng serve {name} --port {port}".to_string(),
            build: "ng build {name}".to_string(),
        }
    }
}

/// Configuration bound to a repository root
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed (or default) configuration
    pub config: ScaffoldConfig,

    /// Repository root all relative paths hang off
    pub root: Utf8PathBuf,

    /// File the configuration was read from, if any
    pub source: Option<Utf8PathBuf>,
}

impl LoadedConfig {
    /// Load configuration for `root`
    ///
    /// An explicit path must exist. Without one, `exkit.yaml`/`exkit.yml` in
    /// the root are tried and defaults are used when neither is present.
    pub fn load(root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let source = match explicit {
            Some(path) => Some(path.to_owned()),
            None => CONFIG_FILE_NAMES
                .iter()
                .map(|name| root.join(name))
                .find(|candidate| candidate.is_file()),
        };

        let config = match &source {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(path.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                debug!("Loaded config from {}", path);
                Self::parse(path, &content)?
            }
            None => {
                debug!("No config file in {}, using defaults", root);
                ScaffoldConfig::default()
            }
        };

        Ok(Self {
            config,
            root: root.to_owned(),
            source,
        })
    }

    /// Wrap an in-memory configuration
    pub fn from_config(root: impl Into<Utf8PathBuf>, config: ScaffoldConfig) -> Self {
        Self {
            config,
            root: root.into(),
            source: None,
        }
    }

    fn parse(path: &Utf8Path, content: &str) -> Result<ScaffoldConfig> {
        if content.trim().is_empty() {
            return Ok(ScaffoldConfig::default());
        }
        serde_yaml_ng::from_str(content)
            .map_err(|e| Error::config_parse(path.as_str(), e.to_string()))
    }

    /// Absolute (or root-relative) projects directory
    pub fn projects_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.config.projects_dir)
    }

    /// Absolute (or root-relative) manifest path
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.root.join(&self.config.manifest)
    }

    /// README template override, resolved against the root
    pub fn readme_template_path(&self) -> Option<Utf8PathBuf> {
        self.config
            .readme_template
            .as_ref()
            .map(|path| self.root.join(path))
    }
}
