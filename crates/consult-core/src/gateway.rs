//! Completion gateway abstraction.
//!
//! The gateway is stateless per call: it receives the whole transcript every
//! time and returns one reply string.

use crate::error::Result;
use crate::session::Turn;

/// Reply used when a successful response carries no usable content.
pub const NO_ANSWER_FALLBACK: &str = "No answer available.";

/// Generation parameters sent alongside the transcript.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Remote text-generation service.
///
/// Implementations return `Err` for transport failures and non-success
/// statuses, and fall back to [`NO_ANSWER_FALLBACK`] when a successful
/// response is missing its content.
#[async_trait::async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, turns: &[Turn], params: GenerationParams) -> Result<String>;
}
