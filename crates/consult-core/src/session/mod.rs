//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: transcript unit types (`Role`, `Turn`)
//! - `app_mode`: operating modes and their prompts (`Mode`, `ModeRegistry`)
//! - `history`: the transcript ledger (`History`)
//! - `model`: the live `Session` aggregate
//! - `user_input`: operator line classification (`UserInput`)

mod app_mode;
mod history;
mod message;
mod model;
mod user_input;

// Re-export public API
pub use app_mode::{Mode, ModeRegistry};
pub use history::History;
pub use message::{Role, Turn};
pub use model::Session;
pub use user_input::UserInput;
