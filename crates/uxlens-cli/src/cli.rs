//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Uxlens - screenshot UX analysis with multimodal language models
///
/// Runs the analysis HTTP server, analyzes a local screenshot from the
/// terminal, or checks an existing analysis document against the schema.
#[derive(Parser, Debug)]
#[command(
    name = "uxlens",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "UXLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server exposing the analysis endpoints
    Serve(ServeArgs),

    /// Analyze a screenshot and print the resulting document
    Analyze(AnalyzeArgs),

    /// Normalize and validate an analysis document
    Validate(ValidateArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Config store file with `ai_config` and `brand_manual` (overrides `store`)
    #[arg(long, value_name = "STORE_FILE")]
    pub store: Option<PathBuf>,
}

/// Arguments for the analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Screenshot file path or HTTP(S) URL
    #[arg(value_name = "IMAGE")]
    pub image: String,

    /// Description of the screen and product
    #[arg(long)]
    pub context: String,

    /// The user goal the screen is meant to serve
    #[arg(long = "job")]
    pub job_to_be_done: String,

    /// Image format used for the data URI (defaults to the file extension)
    #[arg(long, value_name = "FORMAT")]
    pub image_format: Option<String>,

    /// Config store file (overrides `store`)
    #[arg(long, value_name = "STORE_FILE")]
    pub store: Option<PathBuf>,

    /// Save the analysis document to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the analysis document (JSON or YAML)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Validate the document as-is, without normalizing it first
    #[arg(long)]
    pub no_normalize: bool,

    /// Print the normalized document when it is valid
    #[arg(long)]
    pub print: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to `./uxlens.yaml`)
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Print secrets instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["uxlens", "-vv", "validate", "analysis.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::parse_from([
            "uxlens",
            "analyze",
            "shot.png",
            "--context",
            "Checkout",
            "--job",
            "Pay quickly",
            "--save-to",
            "out.json",
        ]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.image, "shot.png");
        assert_eq!(args.job_to_be_done, "Pay quickly");
        assert_eq!(args.save_to, Some(PathBuf::from("out.json")));
        assert!(args.image_format.is_none());
    }

    #[test]
    fn test_serve_bind_is_parsed() {
        let cli = Cli::parse_from(["uxlens", "serve", "--bind", "127.0.0.1:9000"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.bind, Some("127.0.0.1:9000".parse().unwrap()));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["uxlens", "-q", "-v", "validate", "a.json"]);
        assert!(result.is_err());
    }
}
