use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for stderr output
    pub console_level: Level,
    /// Log level for file output
    pub file_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: Level::WARN,
            file_level: Level::DEBUG,
            log_dir: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "gitlab-fragments") {
            proj_dirs.cache_dir().to_path_buf()
        } else {
            PathBuf::from("gitlab-fragments-logs")
        }
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("GITLAB_FRAGMENTS_LOG_LEVEL") {
            if let Ok(parsed_level) = level.parse::<Level>() {
                config.console_level = parsed_level;
                config.file_level = parsed_level;
            }
        }

        // File logging is opt-in for a one-shot CLI
        if let Ok(log_dir) = std::env::var("GITLAB_FRAGMENTS_LOG_DIR") {
            config.log_dir = Some(if log_dir.is_empty() {
                Self::default_log_dir()
            } else {
                PathBuf::from(log_dir)
            });
        }

        if std::env::var("GITLAB_FRAGMENTS_JSON_LOGS").is_ok() {
            config.json_format = true;
        }

        config
    }

    /// Apply the `log_level` setting of the configuration file
    pub fn with_level_override(mut self, log_level: Option<&str>) -> Self {
        match log_level {
            Some("Off") => self.log_dir = None,
            Some(level) => {
                if let Ok(level) = level.parse::<Level>() {
                    self.console_level = level;
                    self.file_level = level;
                }
            },
            None => {},
        }
        self
    }
}

/// Initialize the logging system with the given configuration
///
/// Logs go to stderr so stdout carries only fragments.
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "gitlab-fragments.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(config.file_level.into())
                        .from_env_lossy(),
                )
                .boxed()
        };

        layers.push(file_layer);
    }

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(config.console_level.into())
                .from_env_lossy(),
        )
        .boxed();
    layers.push(console_layer);

    tracing_subscriber::registry()
        .with(layers)
        .try_init()?;

    Ok(guard)
}
