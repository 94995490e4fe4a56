//! Logging initialization.
//!
//! Console logging via tracing with an optional non-blocking file
//! layer. The filter comes from `PANEL_LOG`, then `RUST_LOG`, then the
//! configured default level. `log` macros from older modules are
//! bridged into the same subscriber.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration, decided once at startup.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_enabled: bool,
    pub file_enabled: bool,
    /// Log file path; `smart-panel.log` in the working directory when
    /// unset.
    pub file_path: Option<String>,
    /// Emit JSON lines instead of the compact human format.
    pub json_format: bool,
    /// Filter used when no environment variable overrides it.
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            file_path: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

/// Initializes the global subscriber. Returns the file writer guard,
/// which must stay alive for buffered log lines to be flushed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, String> {
    let env_filter = EnvFilter::try_from_env("PANEL_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let console_layer = if config.console_enabled {
        let layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().compact().boxed()
        };
        Some(layer)
    } else {
        None
    };

    let mut file_guard = None;
    let file_layer = if config.file_enabled {
        let configured = config
            .file_path
            .clone()
            .unwrap_or_else(|| "smart-panel.log".to_string());
        let path = std::path::Path::new(&configured);
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => std::path::Path::new("."),
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "smart-panel.log".to_string());

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .boxed(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| format!("failed to initialize logging: {err}"))?;

    Ok(file_guard)
}

/// Console-only logging at the default level.
pub fn init_logging_default() -> Option<WorkerGuard> {
    init_logging(&LogConfig::default()).unwrap_or(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
        assert!(!config.json_format);
        assert_eq!(config.default_level, "info");
    }

    #[test]
    fn test_reinit_does_not_panic() {
        // A second init fails quietly instead of panicking.
        let _ = init_logging_default();
        let _ = init_logging_default();
    }
}
