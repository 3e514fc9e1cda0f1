//! Operator input parsing.

use super::app_mode::Mode;

/// One line typed by the operator, classified.
///
/// Command words are matched case-insensitively after trimming; any other
/// non-blank line is a reply for the transcript, kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Blank or whitespace-only line.
    Empty,
    Exit,
    Clear,
    Summary,
    /// Toggle between structured-json and plain.
    ToggleJson,
    Help,
    /// `mode` alone reports the current mode; `mode <name>` switches.
    Mode(Option<Mode>),
    /// Natural language reply, verbatim.
    Reply(String),
}

impl UserInput {
    /// Classifies a raw line. `mode <word>` is a command only when `<word>`
    /// names a mode; otherwise the line is a reply like any other.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return UserInput::Empty;
        }

        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "exit" => UserInput::Exit,
            "clear" => UserInput::Clear,
            "summary" => UserInput::Summary,
            "json" => UserInput::ToggleJson,
            "help" => UserInput::Help,
            "mode" => UserInput::Mode(None),
            _ => match lower.split_whitespace().collect::<Vec<_>>().as_slice() {
                ["mode", name] => match name.parse::<Mode>() {
                    Ok(mode) => UserInput::Mode(Some(mode)),
                    Err(_) => UserInput::Reply(line.to_string()),
                },
                _ => UserInput::Reply(line.to_string()),
            },
        }
    }
}
