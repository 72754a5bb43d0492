//! officetpl - Office template installer
//!
//! Installs a folder of Word, PowerPoint and Excel templates as the Office
//! defaults, or removes them again. All work is delegated to the ops crate;
//! this binary parses arguments, merges configuration and renders output.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use officetpl_config::{Config, LogChannels};
use officetpl_events::EventReceiver;
use officetpl_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use officetpl_platform::default_registry;
use std::process;
use tracing::{debug, error, warn};

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic, returning the process exit code
fn run(cli: &Cli) -> Result<i32, CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref())?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    let command = cli.resolved_command();
    apply_cli_config(&mut config, &cli.global, &command);

    init_tracing(cli.global.json, cli.global.debug, config.general.design_mode);
    debug!("Starting officetpl v{}", env!("CARGO_PKG_VERSION"));

    let (event_sender, event_receiver) = officetpl_events::channel();
    let ops_ctx = OpsContextBuilder::new()
        .with_registry(default_registry())
        .with_event_sender(event_sender)
        .with_config(config.clone())
        .build()?;

    let renderer = OutputRenderer::new(
        cli.global.json,
        config.general.design_mode,
        cli.global.color.unwrap_or(config.general.color),
    );
    let channels = if cli.global.debug {
        LogChannels::all()
    } else {
        config.log_channels()
    };
    let event_handler = EventHandler::new(channels, cli.global.debug);

    renderer.render_intro(&command);
    let result = execute_command_with_events(command, ops_ctx, event_receiver, event_handler)?;
    renderer.render_result(&result)?;

    debug!("Command completed");
    Ok(exit_code(&result))
}

/// Run the command while a second thread drains the event channel
fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    mut event_handler: EventHandler,
) -> Result<OperationResult, CliError> {
    let drain = std::thread::spawn(move || {
        while let Some(message) = event_receiver.blocking_recv() {
            event_handler.handle_event(&message);
        }
        event_handler
    });

    let result = execute_command(command, &ops_ctx);

    // The context owns the only sender; dropping it ends the drain loop
    drop(ops_ctx);
    match drain.join() {
        Ok(handler) => debug!(warnings = handler.warnings(), "Event stream closed"),
        Err(_) => warn!("Event handler thread panicked"),
    }
    result
}

/// Execute the specified command
fn execute_command(command: Commands, ctx: &OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Install { payload, .. } => {
            let report = officetpl_ops::install(ctx, payload.as_deref())?;
            Ok(OperationResult::InstallReport(report))
        }
        Commands::Uninstall { payload } => {
            let report = officetpl_ops::uninstall(ctx, payload.as_deref())?;
            Ok(OperationResult::UninstallReport(report))
        }
        Commands::CheckAuthor { path } => Ok(OperationResult::AuthorCheck(
            officetpl_ops::check_author(ctx, &path),
        )),
        Commands::Paths => Ok(OperationResult::Paths(officetpl_ops::paths(ctx))),
    }
}

/// A denied author check exits with 1; every completed run exits with 0
fn exit_code(result: &OperationResult) -> i32 {
    match result {
        OperationResult::AuthorCheck(check) if !check.is_allowed() || check.is_error() => 1,
        _ => 0,
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled: bool, design_mode: bool) {
    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::log_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "officetpl-{}.log",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Console mode: the event handler already applied channel selection
        let default_filter = if design_mode {
            "warn,officetpl=debug"
        } else {
            "warn,officetpl=info"
        };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
            )
            .init();
    }
}

/// Apply CLI configuration overrides
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    // Global CLI flags override everything
    if let Some(color) = &global.color {
        config.general.color = *color;
    }
    if global.design_mode {
        config.general.design_mode = true;
    }
    if let Some(list) = &global.allowed_authors {
        config.authors.replace_from_list(list);
    }

    // Command-specific CLI flags
    if let Commands::Install {
        no_validation: true,
        ..
    } = command
    {
        config.authors.validation_enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officetpl_types::AuthorCheckResult;

    #[test]
    fn cli_flags_win_over_config() {
        let cli = Cli::try_parse_from([
            "officetpl",
            "--allowed-authors",
            " acme ; ;contoso",
            "install",
            "--no-validation",
            "--design-mode",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_cli_config(&mut config, &cli.global, &cli.resolved_command());
        assert!(config.general.design_mode);
        assert!(!config.authors.validation_enabled);
        assert_eq!(config.allowed_authors(), vec!["acme", "contoso"]);
    }

    #[test]
    fn denied_author_check_exits_with_one() {
        let denied = OperationResult::AuthorCheck(AuthorCheckResult::denied("no", Vec::new()));
        let allowed =
            OperationResult::AuthorCheck(AuthorCheckResult::allowed("ok", vec!["a".into()]));
        assert_eq!(exit_code(&denied), 1);
        assert_eq!(exit_code(&allowed), 0);
    }
}
