//! Error types for the Consult application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Consult application.
///
/// Two classes matter to the session driver: authentication failures are
/// fatal at startup, gateway failures are recoverable per turn.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsultError {
    /// Failed to obtain a bearer credential from the token endpoint
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The completion gateway call failed (transport or non-success status)
    #[error("Gateway error{}: {message}", status_code.map(|c| format!(" (HTTP {c})")).unwrap_or_default())]
    Gateway {
        status_code: Option<u16>,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsultError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Gateway error
    pub fn gateway(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Gateway {
            status_code,
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a gateway error
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// HTTP status attached to a gateway error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Gateway { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ConsultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ConsultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConsultError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ConsultError>`.
pub type Result<T> = std::result::Result<T, ConsultError>;
