//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Logs go to stderr so stdout only carries the ranked listings.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `verbose` selects DEBUG instead of INFO; `RUST_LOG` overrides both.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(config: &focus_core::Config, verbose_override: bool, json_override: bool) {
    let (verbose, json_format) = resolve(&config.logging, verbose_override, json_override);
    init(verbose, json_format);
}

fn resolve(
    logging: &focus_core::config::LoggingConfig,
    verbose_override: bool,
    json_override: bool,
) -> (bool, bool) {
    let verbose = verbose_override || matches!(logging.level.as_str(), "debug" | "trace");
    let json_format = json_override || logging.format == "json";
    (verbose, json_format)
}
