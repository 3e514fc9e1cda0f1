use clap::Parser;
use consult_core::session::Mode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "consult")]
#[command(about = "Console chat client with plain, structured-JSON and guided-intake modes", long_about = None)]
pub struct Cli {
    /// Startup mode: plain, json or intake
    #[arg(long, default_value = "plain")]
    pub mode: Mode,

    /// Gateway settings file (default: ~/.config/consult/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Credentials file (default: ~/.config/consult/secret.json)
    #[arg(long)]
    pub secret: Option<PathBuf>,

    /// Tracing filter directives, e.g. "debug" or "consult_interaction=debug"
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to ~/.config/consult/logs
    #[arg(long)]
    pub log_file: bool,
}
