//! File-backed storage for configuration and secrets.

mod config_storage;
mod secret_storage;

pub use config_storage::{ConfigStorage, ConfigStorageError};
pub use secret_storage::{SecretStorage, SecretStorageError};

use consult_core::ConsultError;

impl From<ConfigStorageError> for ConsultError {
    fn from(err: ConfigStorageError) -> Self {
        match err {
            ConfigStorageError::Unreadable { .. } => ConsultError::io(err.to_string()),
            ConfigStorageError::Malformed { .. } => ConsultError::Serialization {
                format: "TOML".to_string(),
                message: err.to_string(),
            },
            ConfigStorageError::HomeDirNotFound => ConsultError::config(err.to_string()),
        }
    }
}

impl From<SecretStorageError> for ConsultError {
    fn from(err: SecretStorageError) -> Self {
        match err {
            SecretStorageError::Unreadable { .. } => ConsultError::io(err.to_string()),
            SecretStorageError::Malformed { .. } => ConsultError::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            },
            SecretStorageError::Missing(_) | SecretStorageError::HomeDirNotFound => {
                ConsultError::config(err.to_string())
            }
        }
    }
}
