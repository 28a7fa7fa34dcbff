//! Uxlens CLI - screenshot UX analysis from the terminal or over HTTP
//!
//! This is the main entry point for the `uxlens` binary, providing the
//! analysis server, one-shot analysis of local screenshots, and validation
//! of analysis documents.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
mod server;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    control::set_override(cli.use_color());

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // Held until exit so buffered file logs are flushed
    let _log_guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    if let Err(e) = run(cli, config).await {
        exit_with(&e);
    }
}

fn exit_with(error: &error::Error) -> ! {
    eprintln!("{}", error::format_error(error, control::SHOULD_COLORIZE.should_colorize()));
    if error.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }
    process::exit(error.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet, cli.verbosity_level());

    tracing::info!(
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Serve(args) => handlers::handle_serve(args, &config, &mut output).await,
        Commands::Analyze(args) => handlers::handle_analyze(args, &config, &mut output).await,
        Commands::Validate(args) => handlers::handle_validate(args, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system from flags, the config file and the environment
fn init_logging(
    cli: &Cli,
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.apply_settings(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
