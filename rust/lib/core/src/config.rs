//! Chaincode host configuration.
//!
//! Read from a TOML file; a missing file yields defaults:
//!
//! ```toml
//! log_filter = "info"
//! decode = "lenient"
//!
//! [world_state]
//! path = "world_state.redb"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// How stored bytes that are not a valid record are treated on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Log a warning and return an all-empty record. Matches records written
    /// by earlier chaincode versions that never validated their input.
    #[default]
    Lenient,
    /// Fail the operation with `ContractError::Decode`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStateConfig {
    /// Path to the redb database file. Relative paths resolve against the
    /// directory of the config file.
    #[serde(default = "default_world_state_path")]
    pub path: PathBuf,
}

impl Default for WorldStateConfig {
    fn default() -> Self {
        Self {
            path: default_world_state_path(),
        }
    }
}

fn default_world_state_path() -> PathBuf {
    PathBuf::from("world_state.redb")
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Configuration shared by everything hosting the contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub decode: DecodePolicy,

    #[serde(default)]
    pub world_state: WorldStateConfig,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            decode: DecodePolicy::default(),
            world_state: WorldStateConfig::default(),
        }
    }
}

impl ChaincodeConfig {
    /// Default config file path: `./fwchain.toml`.
    pub fn default_path() -> PathBuf {
        PathBuf::from("fwchain.toml")
    }

    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ChaincodeConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.world_state.path.is_relative() {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                config.world_state.path = dir.join(&config.world_state.path);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = ChaincodeConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, ChaincodeConfig::default());
        assert_eq!(config.decode, DecodePolicy::Lenient);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn parses_and_resolves_relative_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fwchain.toml");
        std::fs::write(
            &path,
            r#"
log_filter = "debug"
decode = "strict"

[world_state]
path = "state/ws.redb"
"#,
        )
        .unwrap();

        let config = ChaincodeConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.decode, DecodePolicy::Strict);
        assert_eq!(config.world_state.path, tmp.path().join("state/ws.redb"));
    }

    #[test]
    fn absolute_path_kept() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fwchain.toml");
        std::fs::write(&path, "[world_state]\npath = \"/var/lib/fwchain/ws.redb\"\n").unwrap();

        let config = ChaincodeConfig::load(&path).unwrap();
        assert_eq!(config.world_state.path, PathBuf::from("/var/lib/fwchain/ws.redb"));
        assert_eq!(config.decode, DecodePolicy::Lenient);
    }

    #[test]
    fn rejects_unknown_policy() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fwchain.toml");
        std::fs::write(&path, "decode = \"paranoid\"\n").unwrap();
        assert!(matches!(
            ChaincodeConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
