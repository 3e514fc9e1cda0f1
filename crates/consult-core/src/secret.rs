//! Secret management service trait.
//!
//! Defines the interface for resolving the client credentials used by the
//! authentication step.

use crate::config::GigaChatSecret;
use crate::error::Result;

/// Service for resolving client credentials.
///
/// # Security Note
///
/// Implementations must never log or embed the client secret in error
/// messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Resolves the client identifier/secret pair.
    ///
    /// # Returns
    ///
    /// - `Ok(GigaChatSecret)`: credentials found
    /// - `Err(ConsultError::Config)`: no credentials in any source
    async fn load_credentials(&self) -> Result<GigaChatSecret>;
}
