//! Logging and tracing setup
//!
//! Console output for operators plus optional JSON files rotated daily, both
//! filtered by `RUST_LOG` when set and by the configured directive otherwise.

use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,

    /// Write JSON logs to daily files in this directory
    pub json_log_dir: Option<PathBuf>,

    /// Whether to write human-readable logs to stdout
    pub enable_console_logs: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json_log_dir: None,
            enable_console_logs: true,
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Initialize the global subscriber.
///
/// Fails if the log directory cannot be created or a subscriber is already set.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = config.env_filter();
    let mut layers = Vec::new();

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_filter(env_filter.clone())
            .boxed();

        layers.push(console_layer);
    }

    if let Some(log_dir) = &config.json_log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "dbadmin.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop and must outlive every log call.
        std::mem::forget(guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();

        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::info!(
        json_log_dir = ?config.json_log_dir,
        console_enabled = config.enable_console_logs,
        "Logging system initialized"
    );

    Ok(())
}
