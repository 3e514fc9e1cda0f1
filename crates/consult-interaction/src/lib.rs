//! Remote collaborators and the session driver.
//!
//! - [`GigaChatApiAgent`]: authentication step and completion gateway over HTTP
//! - [`InteractionManager`]: the operator-command state machine

pub mod gigachat_api_agent;
pub mod interaction_manager;

pub use gigachat_api_agent::{AccessToken, GigaChatApiAgent};
pub use interaction_manager::{InteractionManager, InteractionResult};
