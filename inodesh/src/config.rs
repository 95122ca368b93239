//! Shell configuration
//!
//! Defaults can be overridden by a JSON file, and the command line wins over
//! both.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default name of the backing store inside the namespace root
pub const DEFAULT_STORE_NAME: &str = "inodes_list";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Directory holding the backing store and sidecar placeholders
    pub root_dir: PathBuf,
    /// File name of the backing store inside `root_dir`
    pub store_name: String,
    /// Whether to write sidecar placeholder files
    pub sidecars: bool,
    /// Prompt printed before each command
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            store_name: DEFAULT_STORE_NAME.to_string(),
            sidecars: true,
            prompt: "> ".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parses a JSON config document; missing keys keep their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Full path of the backing store
    pub fn store_path(&self) -> PathBuf {
        self.root_dir.join(&self.store_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.store_name, "inodes_list");
        assert!(config.sidecars);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.store_path(), PathBuf::from("./inodes_list"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShellConfig::from_json(r#"{ "store_name": "table.bin" }"#).unwrap();
        assert_eq!(config.store_name, "table.bin");
        assert!(config.sidecars);
        assert_eq!(config.root_dir, PathBuf::from("."));
    }

    #[test]
    fn test_full_json() {
        let config = ShellConfig::from_json(
            r#"
            {
              "root_dir": "/tmp/fs",
              "store_name": "inodes",
              "sidecars": false,
              "prompt": "$ "
            }
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/tmp/fs/inodes"));
        assert!(!config.sidecars);
        assert_eq!(config.prompt, "$ ");
    }

    #[test]
    fn test_invalid_json() {
        let result = ShellConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ShellConfig::from_json_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
