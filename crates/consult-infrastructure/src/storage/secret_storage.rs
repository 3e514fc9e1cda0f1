//! Reader for `secret.json`, the GigaChat client credentials file.
//!
//! ```json
//! {
//!   "gigachat": {
//!     "client_id": "...",
//!     "client_secret": "...",
//!     "scope": "GIGACHAT_API_PERS"
//!   }
//! }
//! ```
//!
//! `scope` is optional. Empty credentials are returned as-is; deciding
//! whether they are usable is up to [`crate::SecretServiceImpl`].

use crate::paths::ConsultPaths;
use consult_core::config::SecretConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Why `secret.json` could not be turned into a [`SecretConfig`].
#[derive(Debug)]
pub enum SecretStorageError {
    /// No file at the path; callers may fall back to the environment.
    Missing(PathBuf),
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Not JSON, or not the credentials layout.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    HomeDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::Missing(path) => {
                write!(f, "no credentials file at {}", path.display())
            }
            SecretStorageError::Unreadable { path, source } => {
                write!(f, "cannot read credentials file {}: {source}", path.display())
            }
            SecretStorageError::Malformed { path, source } => {
                write!(f, "credentials file {} is malformed: {source}", path.display())
            }
            SecretStorageError::HomeDirNotFound => {
                write!(f, "cannot locate the home directory for ~/.config/consult")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SecretStorageError::Unreadable { source, .. } => Some(source),
            SecretStorageError::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Location of `secret.json`. Read-only; the template is written by
/// [`ConsultPaths::ensure_secret_file`].
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// `~/.config/consult/secret.json`.
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = ConsultPaths::secret_file().map_err(|_| SecretStorageError::HomeDirNotFound)?;
        Ok(Self { path })
    }

    /// Storage for a file given with `--secret`.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::Missing(self.path.clone()));
        }

        let content =
            fs::read_to_string(&self.path).map_err(|source| SecretStorageError::Unreadable {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| SecretStorageError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
