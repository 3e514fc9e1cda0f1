//! Configuration models.
//!
//! `SecretConfig` mirrors `secret.json`, `AppConfig` mirrors `config.toml`.
//! Every field of `AppConfig` has a default so a missing file or table is
//! valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "GigaChat";
pub const DEFAULT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_API_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";
pub const DEFAULT_SCOPE: &str = "GIGACHAT_API_PERS";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Root structure of secret.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gigachat: Option<GigaChatSecret>,
}

/// Client credentials exchanged for a bearer token.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GigaChatSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for GigaChatSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GigaChatSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Root structure of config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// `[gateway]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: String,
    pub auth_url: String,
    pub api_url: String,
    pub scope: String,
    pub max_tokens: u32,
    /// Skip TLS certificate validation (test stands with self-signed chains).
    pub accept_invalid_certs: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            accept_invalid_certs: false,
        }
    }
}
