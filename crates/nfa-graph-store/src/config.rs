//! Store configuration.
//!
//! Supports loading configuration from environment variables (and a `.env`
//! file) on top of platform defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding [`StoreConfig::root`].
pub const ENV_ROOT: &str = "NFA_GRAPH_STORE_ROOT";
/// Environment variable overriding [`StoreConfig::extension`].
pub const ENV_EXTENSION: &str = "NFA_GRAPH_STORE_EXTENSION";
/// Environment variable overriding [`StoreConfig::pretty`].
pub const ENV_PRETTY: &str = "NFA_GRAPH_STORE_PRETTY";
/// Environment variable overriding [`StoreConfig::archive_dir`].
pub const ENV_ARCHIVE_DIR: &str = "NFA_GRAPH_ARCHIVE_DIR";

/// Where and how documents are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory documents are saved in.
    pub root: PathBuf,

    /// File extension for documents (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Pretty-print encoded documents.
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Directory archives are written to; defaults to `root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_dir: Option<PathBuf>,
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        let root = ProjectDirs::from("dev", "nfa-graph", "nfa-graph")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("nfa-graph"));

        Self::at(root)
    }
}

impl StoreConfig {
    /// Default settings rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: default_extension(),
            pretty: default_pretty(),
            archive_dir: None,
        }
    }

    /// Load configuration from the environment on top of the defaults.
    pub fn load() -> StoreResult<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, keyed by the `ENV_*` names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> StoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_ROOT) {
            self.root = PathBuf::from(root);
        }
        if let Some(extension) = lookup(ENV_EXTENSION) {
            self.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(pretty) = lookup(ENV_PRETTY) {
            self.pretty = pretty.parse().map_err(|_| StoreError::InvalidConfig {
                key: ENV_PRETTY.to_string(),
                value: pretty.clone(),
            })?;
        }
        if let Some(dir) = lookup(ENV_ARCHIVE_DIR) {
            self.archive_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Directory archives are written to.
    pub fn archive_dir(&self) -> &Path {
        self.archive_dir.as_deref().unwrap_or(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::at("/tmp/docs");
        assert_eq!(config.extension, "json");
        assert!(config.pretty);
        assert_eq!(config.archive_dir(), Path::new("/tmp/docs"));
    }

    #[test]
    fn test_overrides() {
        let mut config = StoreConfig::at("/tmp/docs");
        config
            .apply_overrides(lookup_from(&[
                (ENV_ROOT, "/srv/machines"),
                (ENV_EXTENSION, ".txt"),
                (ENV_PRETTY, "false"),
                (ENV_ARCHIVE_DIR, "/srv/archives"),
            ]))
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/machines"));
        assert_eq!(config.extension, "txt");
        assert!(!config.pretty);
        assert_eq!(config.archive_dir(), Path::new("/srv/archives"));
    }

    #[test]
    fn test_invalid_bool_is_reported() {
        let mut config = StoreConfig::at("/tmp/docs");
        let err = config
            .apply_overrides(lookup_from(&[(ENV_PRETTY, "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig { ref key, .. } if key == ENV_PRETTY));
    }

    #[test]
    fn test_config_file_roundtrip_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{ "root": "/data" }"#).unwrap();
        assert_eq!(config, StoreConfig::at("/data"));
    }
}
