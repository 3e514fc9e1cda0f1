//! Reader for `config.toml`, the gateway settings file.
//!
//! Every key of the `[gateway]` table is optional; see
//! [`consult_core::config::GatewayConfig`] for the defaults.

use crate::paths::ConsultPaths;
use consult_core::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Why `config.toml` could not be turned into an [`AppConfig`].
#[derive(Debug)]
pub enum ConfigStorageError {
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },
    HomeDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::Unreadable { path, source } => {
                write!(f, "cannot read settings file {}: {source}", path.display())
            }
            ConfigStorageError::Malformed { path, source } => {
                write!(f, "settings file {} is malformed: {source}", path.display())
            }
            ConfigStorageError::HomeDirNotFound => {
                write!(f, "cannot locate the home directory for ~/.config/consult")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigStorageError::Unreadable { source, .. } => Some(source),
            ConfigStorageError::Malformed { source, .. } => Some(source),
            ConfigStorageError::HomeDirNotFound => None,
        }
    }
}

/// Location of `config.toml`. A missing file means "all defaults".
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// `~/.config/consult/config.toml`.
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = ConsultPaths::config_file().map_err(|_| ConfigStorageError::HomeDirNotFound)?;
        Ok(Self { path })
    }

    /// Storage for a file given with `--config`.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<AppConfig, ConfigStorageError> {
        if !self.path.exists() {
            tracing::debug!("No config file at {}, using defaults", self.path.display());
            return Ok(AppConfig::default());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|source| ConfigStorageError::Unreadable {
                path: self.path.clone(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigStorageError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_core::config::DEFAULT_MODEL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));

        let config = storage.load().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gateway.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[gateway]
max_tokens = 512
accept_invalid_certs = true
api_url = "http://localhost:8080/v1/chat/completions"
"#,
        )
        .unwrap();

        let config = ConfigStorage::with_path(path).load().unwrap();
        assert_eq!(config.gateway.max_tokens, 512);
        assert!(config.gateway.accept_invalid_certs);
        assert_eq!(
            config.gateway.api_url,
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.gateway.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_malformed_file_names_its_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[gateway\nmodel = ").unwrap();

        let err = ConfigStorage::with_path(path).load().unwrap_err();

        assert!(matches!(err, ConfigStorageError::Malformed { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
