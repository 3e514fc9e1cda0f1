//! Unified path management for consult configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/consult/           # Config directory
//! ├── config.toml              # Gateway settings
//! ├── secret.json              # Client credentials
//! └── logs/                    # Optional log files
//!     └── consult.log.YYYY-MM-DD
//! ```

use consult_core::config::{DEFAULT_SCOPE, GigaChatSecret, SecretConfig};
use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for consult.
pub struct ConsultPaths;

impl ConsultPaths {
    /// Returns the consult configuration directory (`~/.config/consult`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("consult"))
    }

    /// Returns the path to the gateway configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Creates a secret.json template at `secret_path` if nothing is there yet.
    ///
    /// The template has empty credentials so the operator only has to fill
    /// them in. On Unix the file is created with mode 600.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: a template was written
    /// - `Ok(false)`: the file already existed and was left untouched
    pub fn ensure_secret_file(secret_path: &Path) -> Result<bool, std::io::Error> {
        if secret_path.exists() {
            return Ok(false);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gigachat: Some(GigaChatSecret {
                client_id: String::new(),
                client_secret: String::new(),
                scope: Some(DEFAULT_SCOPE.to_string()),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template).map_err(std::io::Error::other)?;

        std::fs::write(secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(secret_path, permissions)?;
        }

        tracing::info!("Created secret template at {}", secret_path.display());
        Ok(true)
    }
}
