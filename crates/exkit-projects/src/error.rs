//! Error types for exkit-projects

use thiserror::Error;

/// Result type alias using exkit-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Topic argument is empty
    #[error("Topic name must not be empty")]
    EmptyTopic,

    /// Explicitly requested config file is missing
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Config file could not be parsed
    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Generator program is not on PATH
    #[error("Generator '{program}' not found. Please ensure it is installed and in PATH")]
    GeneratorNotFound { program: String },

    /// Generator exited unsuccessfully
    #[error("Generator failed for {name} (exit code: {code})")]
    GeneratorFailed { name: String, code: String },

    /// Generator succeeded but produced no project directory
    #[error("Generator finished but {path} does not exist")]
    GeneratedDirMissing { path: String },

    /// Manifest is not valid JSON
    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// Manifest root is not a JSON object
    #[error("Manifest {path} must contain a JSON object")]
    ManifestNotObject { path: String },

    /// Manifest has no `scripts` object
    #[error("Manifest {path} has no \"scripts\" object")]
    MissingScripts { path: String },

    /// README template rendering failed
    #[error("Template rendering failed: {message}")]
    TemplateRender { message: String },

    /// Manifest lock could not be acquired
    #[error("Failed to lock {path}: {message}")]
    Lock { path: String, message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Template error from Tera
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generator not found error
    pub fn generator_not_found(program: impl Into<String>) -> Self {
        Self::GeneratorNotFound {
            program: program.into(),
        }
    }

    /// Create a generator failed error
    ///
    /// `code` is `None` when the process was terminated by a signal.
    pub fn generator_failed(name: impl Into<String>, code: Option<i32>) -> Self {
        Self::GeneratorFailed {
            name: name.into(),
            code: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
        }
    }

    /// Create a generated dir missing error
    pub fn generated_dir_missing(path: impl Into<String>) -> Self {
        Self::GeneratedDirMissing { path: path.into() }
    }

    /// Create a manifest parse error
    pub fn manifest_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a manifest not object error
    pub fn manifest_not_object(path: impl Into<String>) -> Self {
        Self::ManifestNotObject { path: path.into() }
    }

    /// Create a missing scripts error
    pub fn missing_scripts(path: impl Into<String>) -> Self {
        Self::MissingScripts { path: path.into() }
    }

    /// Create a template render error
    pub fn template_render(message: impl Into<String>) -> Self {
        Self::TemplateRender {
            message: message.into(),
        }
    }

    /// Create a lock error
    pub fn lock(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lock {
            path: path.into(),
            message: message.into(),
        }
    }
}
