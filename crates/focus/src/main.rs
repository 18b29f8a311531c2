//! Focus CLI - rank a directory of images by sharpness.
//!
//! Every image in the input directory is scored by the variance of its
//! Laplacian, the scores are sorted, and a CSV report is written to the
//! output directory. The sharpest and blurriest images are listed on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Score a directory with the default worker count
//! focus -d ./photos -s ./out
//!
//! # Pick the worker count explicitly
//! focus -d ./photos -s ./out -t 4
//!
//! # View configuration
//! focus config show
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use focus_core::{Config, ConfigError};

mod cli;
mod logging;

/// Focus - rank images by the variance of their Laplacian.
#[derive(Parser, Debug)]
#[command(name = "focus")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    #[command(flatten)]
    scan: cli::scan::ScanArgs,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands. Without one, `focus` scans `--directory`.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config problems go to eprintln.
    let loaded = load_config(cli.config.as_deref());
    match &loaded {
        Ok(config) => logging::init_from_config(config, cli.verbose, cli.json_logs),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Check your config file with `focus config path`."
            );
            logging::init(cli.verbose, cli.json_logs);
        }
    }

    tracing::debug!("Focus v{}", focus_core::VERSION);

    match cli.command {
        Some(Commands::Config(args)) => cli::config::execute(args, cli.config.as_deref(), loaded),
        None => cli::scan::execute(cli.scan, loaded?),
    }
}

/// Load the config named by `--config`, or the default file if present.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(&focus_core::config::expand_path(path)),
        None => Config::load(),
    }
}
