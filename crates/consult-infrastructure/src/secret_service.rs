//! Secret service implementation.
//!
//! Credentials come from secret.json first and from environment variables
//! second.

use crate::storage::{SecretStorage, SecretStorageError};
use consult_core::config::{GigaChatSecret, SecretConfig};
use consult_core::secret::SecretService;
use consult_core::{ConsultError, Result};

pub const ENV_CLIENT_ID: &str = "GIGACHAT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GIGACHAT_CLIENT_SECRET";
pub const ENV_SCOPE: &str = "GIGACHAT_SCOPE";

/// Resolves client credentials for the authentication step.
///
/// # Example
///
/// ```ignore
/// use consult_infrastructure::{SecretServiceImpl, SecretStorage};
/// use consult_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(SecretStorage::new()?);
/// let credentials = service.load_credentials().await?;
/// ```
pub struct SecretServiceImpl {
    storage: SecretStorage,
}

impl SecretServiceImpl {
    pub fn new(storage: SecretStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &SecretStorage {
        &self.storage
    }

    fn load_file(&self) -> Result<Option<SecretConfig>> {
        match self.storage.load() {
            Ok(config) => Ok(Some(config)),
            Err(SecretStorageError::Missing(path)) => {
                tracing::debug!("No secret file at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_credentials(&self) -> Result<GigaChatSecret> {
        let file = self.load_file()?;
        resolve_credentials(file, |key| std::env::var(key).ok()).ok_or_else(|| {
            ConsultError::config(format!(
                "client credentials not found in {} or {}/{} environment variables",
                self.storage.path().display(),
                ENV_CLIENT_ID,
                ENV_CLIENT_SECRET
            ))
        })
    }
}

/// Picks the first complete credential pair: file entry, then environment.
///
/// A file entry with an empty id or secret (e.g. the generated template)
/// counts as absent.
pub(crate) fn resolve_credentials<F>(file: Option<SecretConfig>, env: F) -> Option<GigaChatSecret>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = file.and_then(|c| c.gigachat)
        && !secret.client_id.trim().is_empty()
        && !secret.client_secret.trim().is_empty()
    {
        tracing::debug!("Using credentials from secret file");
        return Some(secret);
    }

    let client_id = env(ENV_CLIENT_ID).filter(|v| !v.trim().is_empty())?;
    let client_secret = env(ENV_CLIENT_SECRET).filter(|v| !v.trim().is_empty())?;
    tracing::debug!("Using credentials from environment");
    Some(GigaChatSecret {
        client_id,
        client_secret,
        scope: env(ENV_SCOPE),
    })
}
