//! README rendering with Tera.

use crate::allocator::Allocation;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use serde::Serialize;
use std::error::Error as _;
use tera::{Context, Tera};
use tracing::debug;

use super::humanize_topic;

/// File written into every new exercise
pub const README_FILE: &str = "README.md";

const TEMPLATE_NAME: &str = "readme";

/// Values available to the README template
#[derive(Debug, Clone, Serialize)]
pub struct ReadmeContext {
    pub padded: String,
    pub title: String,
    pub name: String,
    pub port: u64,
    pub url: String,
    pub start_script: String,
    pub build_script: String,
    pub start_command: String,
    pub build_command: String,
    pub runner: String,
    pub date: String,
}

impl ReadmeContext {
    /// Build the context for an allocation and its registered commands
    pub fn new(
        allocation: &Allocation,
        start_command: impl Into<String>,
        build_command: impl Into<String>,
        runner: impl Into<String>,
    ) -> Self {
        Self {
            padded: allocation.padded.clone(),
            title: humanize_topic(&allocation.topic),
            name: allocation.name.clone(),
            port: allocation.port,
            url: allocation.url(),
            start_script: allocation.start_script(),
            build_script: allocation.build_script(),
            start_command: start_command.into(),
            build_command: build_command.into(),
            runner: runner.into(),
            date: Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    /// Override the creation date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// Renders the exercise README
#[derive(Debug)]
pub struct ReadmeRenderer {
    tera: Tera,
}

impl ReadmeRenderer {
    /// Renderer using the embedded template
    pub fn new() -> Result<Self> {
        Self::from_source(include_str!("readme.md.tera"))
    }

    /// Renderer using a template file on disk
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        debug!("Loading README template from {}", path);
        let source = std::fs::read_to_string(path)?;
        Self::from_source(&source)
    }

    /// Renderer from raw template text
    pub fn from_source(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| Error::template_render(describe(&e)))?;
        Ok(Self { tera })
    }

    /// Render the README text
    pub fn render(&self, context: &ReadmeContext) -> Result<String> {
        let tera_context = Context::from_serialize(context)?;
        self.tera
            .render(TEMPLATE_NAME, &tera_context)
            .map_err(|e| Error::template_render(describe(&e)))
    }

    /// Render and write `README.md` into `target_dir`, replacing any existing file
    pub fn write_to_dir(
        &self,
        context: &ReadmeContext,
        target_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf> {
        let content = self.render(context)?;
        let path = target_dir.join(README_FILE);
        std::fs::write(&path, content)?;
        debug!("Wrote {}", path);
        Ok(path)
    }
}

/// Tera hides the useful part of an error in its source chain
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context_for(sequence: u64, topic: &str) -> ReadmeContext {
        let allocation = Allocation::new(sequence, topic, 4200);
        ReadmeContext::new(
            &allocation,
            format!("ng serve {} --port {}", allocation.name, allocation.port),
            format!("ng build {}", allocation.name),
            "npm",
        )
        .with_date("2026-10-19")
    }

    #[test]
    fn test_embedded_template_heading() {
        let renderer = ReadmeRenderer::new().unwrap();
        let content = renderer.render(&context_for(6, "routing")).unwrap();

        assert!(content.starts_with("# Exercise 06: Routing\n"));
        assert!(content.contains("npm run start:ex06"));
        assert!(content.contains("npm run build:ex06"));
        assert!(content.contains("http://localhost:4206"));
        assert!(content.contains("`exercise-06-routing`"));
        assert!(content.contains("Created: 2026-10-19"));
    }

    #[test]
    fn test_heading_humanizes_topic() {
        let renderer = ReadmeRenderer::new().unwrap();
        let content = renderer.render(&context_for(7, "two-way-binding")).unwrap();
        assert!(content.starts_with("# Exercise 07: Two way binding\n"));
    }

    #[test]
    fn test_custom_template() {
        let renderer =
            ReadmeRenderer::from_source("{{ title }} on {{ port }} via {{ runner }}").unwrap();
        let content = renderer.render(&context_for(2, "forms")).unwrap();
        assert_eq!(content, "Forms on 4202 via npm");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let err = ReadmeRenderer::from_source("{{ title").unwrap_err();
        assert!(matches!(err, Error::TemplateRender { .. }));
    }

    #[test]
    fn test_unknown_variable_fails_render() {
        let renderer = ReadmeRenderer::from_source("{{ author }}").unwrap();
        let err = renderer.render(&context_for(1, "basics")).unwrap_err();
        assert!(matches!(err, Error::TemplateRender { .. }));
    }

    #[test]
    fn test_write_overwrites_existing_readme() {
        let dir = TempDir::new().unwrap();
        let target = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        std::fs::write(target.join(README_FILE), "generated by the generator").unwrap();

        let renderer = ReadmeRenderer::new().unwrap();
        let path = renderer.write_to_dir(&context_for(3, "pipes"), &target).unwrap();

        assert_eq!(path, target.join("README.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Exercise 03: Pipes"));
        assert!(!written.contains("generated by the generator"));
    }
}
