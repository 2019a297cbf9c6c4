//! Logging setup for the CLI.
//!
//! Human-readable logs go to stderr. Structured JSON logs go to a daily
//! rolling file, located by (highest precedence first) `FUTURESNESS_LOG_PATH`,
//! `FUTURESNESS_LOG_DIR`, the config's `log_dir`, or the platform data
//! directory. Stdout is left to command output and the MCP transport.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_PATH_ENV: &str = "FUTURESNESS_LOG_PATH";
const LOG_DIR_ENV: &str = "FUTURESNESS_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "futuresness.log";

/// Where file logs go, and how loud stderr is.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Directory holding the rolling log files.
    pub log_dir: Option<PathBuf>,
    /// File name prefix within `log_dir`.
    pub file_name: String,
    /// Maximum level printed to stderr.
    pub stderr_level: LevelFilter,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_name: DEFAULT_LOG_FILE.to_string(),
            stderr_level: LevelFilter::WARN,
        }
    }
}

impl ObservabilityConfig {
    /// Resolve the log location from the environment, then `config_log_dir`,
    /// then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from);
        let env_dir = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from);
        Self::resolve(env_path, env_dir, config_log_dir)
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = env_path {
            let file_name = path
                .file_name()
                .map_or_else(
                    || DEFAULT_LOG_FILE.to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
            let log_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            return Self {
                log_dir: Some(log_dir),
                file_name,
                ..Self::default()
            };
        }

        let log_dir = env_dir.or(config_log_dir).or_else(default_log_dir);
        Self {
            log_dir,
            ..Self::default()
        }
    }

    /// Set stderr verbosity from `-q` / `-v`.
    pub fn with_verbosity(mut self, quiet: bool, verbose: u8) -> Self {
        self.stderr_level = match (quiet, verbose) {
            (true, _) => LevelFilter::ERROR,
            (false, 0) => LevelFilter::WARN,
            (false, 1) => LevelFilter::INFO,
            (false, 2) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        };
        self
    }
}

fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "futuresness").map(|d| d.data_local_dir().join("logs"))
}

/// Build the event filter: `RUST_LOG` wins, then `-q`/`-v`, then the config level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// Returns the guard flushing the file writer, or `None` when file logging
/// could not be set up; stderr logging works either way.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_filter(config.stderr_level);

    let writer = config
        .log_dir
        .as_deref()
        .map(|dir| file_writer(dir, &config.file_name));
    let (file_layer, guard) = match writer {
        Some(Ok((writer, guard))) => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_file(true)
                .with_line_number(true)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("warning: file logging disabled: {e:#}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

fn file_writer(
    dir: &Path,
    file_name: &str,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    let appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| anyhow::anyhow!("cannot open log file in {}: {e}", dir.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}
