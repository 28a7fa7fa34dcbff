//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use std::path::PathBuf;

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Write a default config file unless one exists
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("uxlens.yaml"));

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Set OPENAI_API_KEY and point store.path at your AI configuration file.")?;
    Ok(())
}

/// Print the effective configuration
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let shown = if args.show_secrets {
        config.clone()
    } else {
        config.redacted()
    };

    let rendered = match args.format {
        ConfigFormat::Toml => toml::to_string_pretty(&shown)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&shown)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&shown)?,
    };
    output.writeln(rendered.trim_end())
}
