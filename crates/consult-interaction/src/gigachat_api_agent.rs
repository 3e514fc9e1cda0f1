//! GigaChatApiAgent - Direct REST API implementation for GigaChat.
//!
//! Authentication is a one-time exchange of a client id/secret pair for a
//! bearer token at startup. The token is never refreshed: once it expires,
//! completion calls fail with an HTTP 401 gateway error.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, Utc};
use consult_core::config::{GatewayConfig, GigaChatSecret};
use consult_core::session::Turn;
use consult_core::{
    CompletionGateway, ConsultError, GenerationParams, NO_ANSWER_FALLBACK, Result,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Bearer credential returned by the token endpoint.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: i64,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: i64) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Expiry as reported by the token endpoint. The endpoint reports
    /// milliseconds on some stands and seconds on others; both are accepted.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_at > 10_000_000_000 {
            DateTime::from_timestamp_millis(self.expires_at)
        } else {
            DateTime::from_timestamp(self.expires_at, 0)
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Agent implementation that talks to the GigaChat HTTP API.
#[derive(Clone)]
pub struct GigaChatApiAgent {
    client: Client,
    config: GatewayConfig,
    token: AccessToken,
}

impl GigaChatApiAgent {
    /// Authenticates against `config.auth_url` and returns a ready agent.
    ///
    /// # Errors
    ///
    /// Returns `ConsultError::Auth` on transport failure, non-success status
    /// or a response without a usable `access_token`.
    pub async fn authenticate(config: GatewayConfig, credentials: &GigaChatSecret) -> Result<Self> {
        let client = build_client(&config)?;
        let token = request_access_token(&client, &config, credentials).await?;
        Ok(Self {
            client,
            config,
            token,
        })
    }

    /// Builds an agent around an already issued token.
    pub fn with_token(config: GatewayConfig, token: AccessToken) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            client,
            config,
            token,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.expires_at()
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.token.value)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                ConsultError::gateway(None, format!("GigaChat API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read GigaChat error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let body_text = response.text().await.map_err(|err| {
            ConsultError::gateway(None, format!("Failed to read GigaChat response: {err}"))
        })?;

        Ok(extract_text_response(&body_text))
    }
}

#[async_trait]
impl CompletionGateway for GigaChatApiAgent {
    async fn complete(&self, turns: &[Turn], params: GenerationParams) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: turns,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            turns = turns.len(),
            temperature = params.temperature,
            "Sending chat completion request"
        );

        self.send_request(&request).await
    }
}

fn build_client(config: &GatewayConfig) -> Result<Client> {
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is disabled for the gateway client");
    }
    Client::builder()
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .map_err(|err| ConsultError::config(format!("Failed to build HTTP client: {err}")))
}

async fn request_access_token(
    client: &Client,
    config: &GatewayConfig,
    credentials: &GigaChatSecret,
) -> Result<AccessToken> {
    let basic = BASE64_STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));
    let scope = credentials.scope.as_deref().unwrap_or(&config.scope);

    let response = client
        .post(&config.auth_url)
        .header("Authorization", format!("Basic {basic}"))
        .header("RqUID", uuid::Uuid::new_v4().to_string())
        .header("Accept", "application/json")
        .form(&[("scope", scope)])
        .send()
        .await
        .map_err(|err| ConsultError::auth(format!("token request failed: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(ConsultError::auth(format!(
            "token endpoint returned {status}: {}",
            error_message(&body_text)
        )));
    }

    let parsed: AuthResponse = response
        .json()
        .await
        .map_err(|err| ConsultError::auth(format!("failed to parse token response: {err}")))?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => {
            tracing::info!(expires_at = parsed.expires_at, "Obtained access token");
            Ok(AccessToken::new(token, parsed.expires_at))
        }
        _ => Err(ConsultError::auth("token endpoint returned no access_token")),
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: i64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Pulls `choices[0].message.content`; anything missing degrades to the
/// fallback reply instead of an error.
fn extract_text_response(body: &str) -> String {
    let parsed = match serde_json::from_str::<ChatCompletionResponse>(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("Unparseable GigaChat response, using fallback: {err}");
            return NO_ANSWER_FALLBACK.to_string();
        }
    };

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_else(|| {
            tracing::warn!("GigaChat response had no content, using fallback");
            NO_ANSWER_FALLBACK.to_string()
        })
}

fn map_http_error(status: StatusCode, body: &str) -> ConsultError {
    ConsultError::gateway(Some(status.as_u16()), error_message(body))
}

/// Error text from `{"message": ..}` or `{"error": {"message": ..}}`, else the raw body.
fn error_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.trim().to_string(),
    };

    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
