//! Command manifest (`package.json` style `scripts` object) updates
//!
//! The manifest is read, modified and written back as a whole. Only the
//! `scripts` object is touched: two keys are inserted or overwritten and the
//! mapping is re-sorted by key. Top-level key order is preserved.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use tracing::debug;

const SCRIPTS_KEY: &str = "scripts";

/// A parsed command manifest
#[derive(Debug, Clone)]
pub struct CommandManifest {
    path: Utf8PathBuf,
    document: Map<String, Value>,
}

/// Outcome of a script update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestUpdate {
    /// Keys that did not exist before
    pub added: Vec<String>,
    /// Keys whose previous value was overwritten
    pub replaced: Vec<String>,
}

impl CommandManifest {
    /// Read and validate the manifest at `path`
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse manifest text; `path` is only used for error messages
    pub fn parse(path: &Utf8Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::manifest_parse(path.as_str(), e.to_string()))?;

        let document = match value {
            Value::Object(map) => map,
            _ => return Err(Error::manifest_not_object(path.as_str())),
        };

        if !document.get(SCRIPTS_KEY).is_some_and(Value::is_object) {
            return Err(Error::missing_scripts(path.as_str()));
        }

        Ok(Self {
            path: path.to_owned(),
            document,
        })
    }

    /// Path the manifest was loaded from
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The `scripts` mapping
    pub fn scripts(&self) -> Result<&Map<String, Value>> {
        self.document
            .get(SCRIPTS_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| Error::missing_scripts(self.path.as_str()))
    }

    fn scripts_mut(&mut self) -> Result<&mut Map<String, Value>> {
        let path = &self.path;
        self.document
            .get_mut(SCRIPTS_KEY)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| Error::missing_scripts(path.as_str()))
    }

    /// Insert or overwrite one script, returning the previous value
    pub fn insert_script(
        &mut self,
        key: impl Into<String>,
        command: impl Into<String>,
    ) -> Result<Option<Value>> {
        let previous = self
            .scripts_mut()?
            .insert(key.into(), Value::String(command.into()));
        Ok(previous)
    }

    /// Sort `scripts` ascending by key
    pub fn sort_scripts(&mut self) -> Result<()> {
        let scripts = self.scripts_mut()?;
        let mut entries = std::mem::take(scripts).into_iter().collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        scripts.extend(entries);
        Ok(())
    }

    /// Serialize with two-space indentation and a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.document)?;
        text.push('\n');
        Ok(text)
    }

    /// Replace the file on disk with the current contents
    ///
    /// The text is written to a sibling temporary file first and renamed over
    /// the manifest so readers never see a half written file.
    pub fn save(&self) -> Result<()> {
        let text = self.to_json_string()?;
        let tmp_path = sibling(&self.path, "tmp");
        fs::write(&tmp_path, text)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!("Saved manifest {}", self.path);
        Ok(())
    }
}

/// `dir/.<file name>.<suffix>` next to `path`
fn sibling(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    let file_name = path.file_name().unwrap_or("manifest");
    path.with_file_name(format!(".{}.{}", file_name, suffix))
}

/// Exclusive advisory lock serializing manifest read-modify-write cycles
///
/// Released when dropped. The lock file is deleted while the lock is still
/// held, so nothing is left next to the manifest afterwards.
#[derive(Debug)]
pub struct ManifestLock {
    _file: File,
    path: Utf8PathBuf,
}

impl ManifestLock {
    /// Block until the lock for `manifest_path` is held
    pub fn acquire(manifest_path: &Utf8Path) -> Result<Self> {
        let path = sibling(manifest_path, "lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| Error::lock(path.as_str(), e.to_string()))?;

        file.lock_exclusive()
            .map_err(|e| Error::lock(path.as_str(), e.to_string()))?;
        debug!("Acquired manifest lock {}", path);

        Ok(Self { _file: file, path })
    }

    /// Lock file path
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ManifestLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Released manifest lock {}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove lock file {}: {}", self.path, e),
        }
    }
}

/// Insert `entries` into the manifest at `path`, re-sort and save
///
/// The whole cycle runs under [`ManifestLock`].
pub fn update_scripts(path: &Utf8Path, entries: &[(String, String)]) -> Result<ManifestUpdate> {
    let _lock = ManifestLock::acquire(path)?;

    let mut manifest = CommandManifest::load(path)?;
    let mut update = ManifestUpdate::default();

    for (key, command) in entries {
        match manifest.insert_script(key.clone(), command.clone())? {
            Some(_) => update.replaced.push(key.clone()),
            None => update.added.push(key.clone()),
        }
    }

    manifest.sort_scripts()?;
    manifest.save()?;

    debug!(
        "Manifest updated: {} added, {} replaced",
        update.added.len(),
        update.replaced.len()
    );
    Ok(update)
}
