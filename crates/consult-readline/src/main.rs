use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use consult_core::secret::SecretService;
use consult_core::session::Mode;
use consult_infrastructure::{ConfigStorage, ConsultPaths, SecretServiceImpl, SecretStorage};
use consult_interaction::{GigaChatApiAgent, InteractionManager, InteractionResult};

mod cli;
mod helper;
mod logging;

use cli::Cli;
use helper::CliHelper;

/// Entry point for the consult REPL.
///
/// Startup (config, credentials, authentication) either succeeds completely
/// or exits before the loop; inside the loop every gateway failure is
/// reported and the session carries on.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_level.as_deref(), cli.log_file)?;

    // ===== Configuration =====
    let config_storage = match &cli.config {
        Some(path) => ConfigStorage::with_path(path.clone()),
        None => ConfigStorage::new()?,
    };
    let app_config = config_storage
        .load()
        .with_context(|| format!("failed to load {}", config_storage.path().display()))?;

    let secret_storage = match &cli.secret {
        Some(path) => SecretStorage::with_path(path.clone()),
        None => SecretStorage::new()?,
    };
    let secret_path = secret_storage.path().to_path_buf();
    let secret_service = SecretServiceImpl::new(secret_storage);
    let credentials = match secret_service.load_credentials().await {
        Ok(credentials) => credentials,
        Err(e) => {
            if ConsultPaths::ensure_secret_file(&secret_path).unwrap_or(false) {
                eprintln!(
                    "{}",
                    format!(
                        "A credentials template was written to {}; fill in client_id and client_secret.",
                        secret_path.display()
                    )
                    .yellow()
                );
            }
            return Err(anyhow!(e));
        }
    };

    // ===== Authentication =====
    println!("{}", "=== Consult ===".bright_magenta().bold());
    println!("{}", "Authenticating...".bright_black());
    let max_tokens = app_config.gateway.max_tokens;
    let agent = GigaChatApiAgent::authenticate(app_config.gateway, &credentials)
        .await
        .context("authentication failed")?;
    match agent.token_expires_at() {
        Some(expires) => println!(
            "{}",
            format!("Authenticated ({}), token valid until {expires}.", agent.model()).bright_black()
        ),
        None => println!("{}", "Authenticated.".bright_black()),
    }

    // ===== Session =====
    tracing::info!(mode = %cli.mode, max_tokens, "starting session");
    let mut manager = InteractionManager::new(Arc::new(agent), cli.mode, max_tokens);
    print_mode_banner(manager.mode());
    if let Some(greeting) = manager.start().await {
        print_assistant(&greeting);
    }

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    // ===== Main REPL Loop =====
    loop {
        let prompt = format!("{} ", "You:".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match manager.handle_input(&line).await {
                    InteractionResult::NoOp => continue,
                    InteractionResult::Exit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    InteractionResult::Cleared { greeting } => {
                        println!("{}", "History cleared.".bright_black());
                        println!();
                        if let Some(greeting) = greeting {
                            print_assistant(&greeting);
                        }
                    }
                    InteractionResult::Summary(Some(summary)) => println!("{summary}"),
                    InteractionResult::Summary(None) => println!(
                        "{}",
                        "No patient record is kept in this mode (switch with 'mode intake').".bright_black()
                    ),
                    InteractionResult::ModeChanged { mode, changed } => {
                        if changed {
                            print_mode_banner(mode);
                        } else {
                            println!("{}", format!("Already in {mode} mode.").bright_black());
                        }
                    }
                    InteractionResult::CurrentMode(mode) => {
                        println!("{}", format!("Current mode: {mode}").bright_black())
                    }
                    InteractionResult::Help(text) => println!("{}", text.bright_black()),
                    InteractionResult::Reply { content, is_final } => {
                        print_assistant(&content);
                        if is_final {
                            println!(
                                "{}",
                                "Intake complete. Type 'summary' to review the record or 'clear' to start over."
                                    .bright_yellow()
                            );
                            println!();
                        }
                    }
                    InteractionResult::Error(message) => {
                        eprintln!("{}", format!("Error: {message}").red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'exit' to quit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

fn print_assistant(content: &str) {
    println!("{}", "Assistant:".green());
    for line in content.lines() {
        println!("{line}");
    }
    println!();
}

fn print_mode_banner(mode: Mode) {
    let hint = match mode {
        Mode::Plain => "Free-form chat. 'json' switches to structured output.",
        Mode::StructuredJson => "Replies are JSON objects. 'json' switches back to plain.",
        Mode::GuidedIntake => "Guided intake. 'summary' shows the record collected so far.",
    };
    println!("{}", format!("Mode: {mode}. {hint}").bright_black());
    println!("{}", "Type 'help' for commands, 'exit' to quit.".bright_black());
    println!();
}
