pub mod config;
pub mod error;
pub mod gateway;
pub mod intake;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{ConsultError, Result};
pub use gateway::{CompletionGateway, GenerationParams, NO_ANSWER_FALLBACK};
