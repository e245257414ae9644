//! Document persistence with optional validate/refactor hooks.
//!
//! A document is any serde type stored as JSON text under
//! `<root>/<name>.<extension>`. Hooks operate on the text:
//!
//! - save: encode, then refactor, then write
//! - load: read, then validate, then refactor, then decode

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Rewrites document text on its way in or out of the store.
pub trait Refactor {
    fn refactor(&self, text: String) -> String;
}

impl<F> Refactor for F
where
    F: Fn(String) -> String,
{
    fn refactor(&self, text: String) -> String {
        self(text)
    }
}

/// Decides whether stored text may be loaded.
pub trait Validator {
    fn validate(&self, text: &str) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, text: &str) -> bool {
        self(text)
    }
}

/// A hook that both validates and refactors.
pub trait ValidateAndRefactor: Validator + Refactor {
    fn as_validator(&self) -> &dyn Validator;
    fn as_refactor(&self) -> &dyn Refactor;
}

impl<T> ValidateAndRefactor for T
where
    T: Validator + Refactor,
{
    fn as_validator(&self) -> &dyn Validator {
        self
    }

    fn as_refactor(&self) -> &dyn Refactor {
        self
    }
}

/// Reads and writes documents under a configured root.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    config: StoreConfig,
}

impl DocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store rooted at `root` with default settings.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::at(root))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Create the root directory if needed.
    pub fn init(&self) -> StoreResult<()> {
        if !self.config.root.exists() {
            std::fs::create_dir_all(&self.config.root)?;
            debug!(path = %self.config.root.display(), "store_root_created");
        }
        Ok(())
    }

    /// File path for the document called `name`.
    ///
    /// Names are single path components: empty names, separators and
    /// `.`/`..` are rejected.
    pub fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\');
        if invalid {
            return Err(StoreError::InvalidPath {
                path: PathBuf::from(name),
            });
        }

        let file_name = if self.config.extension.is_empty() {
            name.to_string()
        } else {
            format!("{name}.{}", self.config.extension)
        };
        Ok(self.config.root.join(file_name))
    }

    /// Serialize `value`, then apply `refactor` to the text.
    pub fn encode<T: Serialize>(
        &self,
        value: &T,
        refactor: Option<&dyn Refactor>,
    ) -> StoreResult<String> {
        let text = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(match refactor {
            Some(r) => r.refactor(text),
            None => text,
        })
    }

    /// Apply `refactor` to `text`, then deserialize it.
    pub fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
        refactor: Option<&dyn Refactor>,
    ) -> StoreResult<T> {
        let value = match refactor {
            Some(r) => serde_json::from_str(&r.refactor(text.to_string()))?,
            None => serde_json::from_str(text)?,
        };
        Ok(value)
    }

    /// Encode `value` and write it as `name`, replacing any previous contents.
    pub fn save<T: Serialize>(
        &self,
        value: &T,
        name: &str,
        refactor: Option<&dyn Refactor>,
    ) -> StoreResult<PathBuf> {
        let path = self.path_for(name)?;
        let text = self.encode(value, refactor)?;

        self.init()?;
        std::fs::write(&path, &text)?;

        info!(path = %path.display(), bytes = text.len(), "document_saved");
        Ok(path)
    }

    /// Read `name`, check it with `validator`, then decode it.
    pub fn load<T: DeserializeOwned>(
        &self,
        name: &str,
        validator: Option<&dyn Validator>,
        refactor: Option<&dyn Refactor>,
    ) -> StoreResult<T> {
        let path = self.path_for(name)?;
        let text = std::fs::read_to_string(&path)?;

        if let Some(v) = validator {
            if !v.validate(&text) {
                warn!(path = %path.display(), "document_rejected");
                return Err(StoreError::ValidationFailed { path });
            }
        }

        let value = self.decode(&text, refactor)?;
        info!(path = %path.display(), bytes = text.len(), "document_loaded");
        Ok(value)
    }

    /// [`load`](Self::load) with one hook doing both jobs.
    pub fn load_with<T: DeserializeOwned>(
        &self,
        name: &str,
        hook: &dyn ValidateAndRefactor,
    ) -> StoreResult<T> {
        self.load(name, Some(hook.as_validator()), Some(hook.as_refactor()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete `name`. Returns whether a file was removed.
    pub fn remove(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        debug!(path = %path.display(), "document_removed");
        Ok(true)
    }

    /// Names of stored documents, sorted.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        if !self.config.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.config.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let stem = if self.config.extension.is_empty() {
                Some(file_name)
            } else {
                file_name.strip_suffix(&format!(".{}", self.config.extension))
            };
            if let Some(stem) = stem.filter(|stem| !stem.is_empty()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Zip the named documents into the configured archive directory.
    pub fn archive(&self, names: &[&str]) -> StoreResult<PathBuf> {
        let paths = names
            .iter()
            .map(|name| self.path_for(name))
            .collect::<StoreResult<Vec<_>>>()?;
        archive::archive_files(&paths, self.config.archive_dir())
    }

    /// Zip the whole store root into the configured archive directory.
    pub fn archive_all(&self) -> StoreResult<PathBuf> {
        archive::archive_dir(&self.config.root, self.config.archive_dir())
    }
}
