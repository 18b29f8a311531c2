//! The `focus config` command for configuration management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use focus_core::config::expand_path;
use focus_core::{Config, ConfigError};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
///
/// `override_path` is the global `--config` flag; `loaded` is the result of
/// loading it (or the default file) at startup.
pub fn execute(
    args: ConfigArgs,
    override_path: Option<&Path>,
    loaded: Result<Config, ConfigError>,
) -> anyhow::Result<()> {
    let path = config_path(override_path);

    match args.command {
        ConfigCommand::Show => {
            let config = loaded
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn config_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(expand_path)
        .unwrap_or_else(Config::default_path)
}

/// Write the default configuration to `path`, creating parent directories.
fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml = Config::default().to_toml()?;
    std::fs::write(path, toml)?;
    Ok(())
}
