use anyhow::Context;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// File name prefix for rotated logs
const LOG_FILE_PREFIX: &str = "game-audio.log";

/// Initialize tracing
///
/// Log output:
/// - Console (stdout) when `console` is set
/// - Daily rotated files named game-audio.log.YYYY-MM-DD when `log_dir` is set
///
/// `RUST_LOG` overrides the configured level. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    // Configure filter (configured level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            Some(
                fmt::layer()
                    .with_writer(rolling::daily(dir, LOG_FILE_PREFIX))
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    let console_layer = config.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log directory: {}", dir.display());
    }
    Ok(())
}
