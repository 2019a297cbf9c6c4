//! Configuration loading and discovery.
//!
//! Sources are merged with figment, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config: `~/.config/futuresness/config.<ext>`
//! 3. Project config, found by walking up from the working directory
//! 4. Files passed explicitly (`--config`)
//! 5. `FUTURESNESS_*` environment variables
//!
//! # Project config names
//!
//! Within one directory, lowest precedence first:
//! `.futures.<ext>`, `futures.<ext>`, `.futuresness.<ext>`, `futuresness.<ext>`,
//! where `<ext>` is one of `toml`, `yaml`, `yml`, `json`. The walk stops at
//! the first directory holding any of them, or at a `.git` boundary.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use futuresness_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("window: {}", config.cooccurrence_window);
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzeOptions;
use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, ResultCache};
use crate::cooccurrence::DEFAULT_COOCCURRENCE_WINDOW;
use crate::error::{ConfigError, ConfigResult};
use crate::matcher::DEFAULT_SNIPPET_CONTEXT;

/// Default maximum input size, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 200_000;

/// Effective configuration for futuresness.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level (`debug`, `info`, `warn`, `error`).
    pub log_level: LogLevel,
    /// Directory for JSON log files. No file logging when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum character distance for two terms to co-occur.
    pub cooccurrence_window: i64,
    /// Characters of context on each side of a snippet.
    pub snippet_context: usize,
    /// Whether reports carry context snippets.
    pub include_snippets: bool,
    /// Vocabulary file replacing the built-in taxonomy.
    pub vocabulary_file: Option<Utf8PathBuf>,
    /// Maximum input size in characters. Defaults to [`DEFAULT_MAX_INPUT_CHARS`].
    pub max_input_chars: Option<usize>,
    /// Remove the input size limit; `max_input_chars` is then ignored.
    pub disable_input_limit: bool,
    /// Reports kept by the MCP server's result cache. Zero disables it.
    pub cache_capacity: usize,
    /// Seconds a cached report stays valid.
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            cooccurrence_window: DEFAULT_COOCCURRENCE_WINDOW,
            snippet_context: DEFAULT_SNIPPET_CONTEXT,
            include_snippets: true,
            vocabulary_file: None,
            max_input_chars: None,
            disable_input_limit: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Config {
    /// Analysis options derived from this config.
    pub const fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            cooccurrence_window: self.cooccurrence_window,
            snippet_context: if self.include_snippets {
                Some(self.snippet_context)
            } else {
                None
            },
        }
    }

    /// The input limit in characters, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_chars.unwrap_or(DEFAULT_MAX_INPUT_CHARS))
        }
    }

    /// An empty result cache sized by this config.
    pub fn result_cache(&self) -> ResultCache {
        ResultCache::new(
            self.cache_capacity,
            Duration::from_secs(self.cache_ttl_secs),
        )
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files, ordered low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files passed explicitly.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence file that was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const APP_NAME: &str = "futuresness";

/// Project config base names, lowest precedence first.
const APP_NAMES: &[&str] = &["futures", "futuresness"];

const ENV_PREFIX: &str = "FUTURESNESS_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// A loader that reads user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Whether to read `~/.config/futuresness/config.<ext>`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward walk at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file; later files win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and return the config with the files it came from.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // FUTURESNESS_COOCCURRENCE_WINDOW=50, FUTURESNESS_LOG_LEVEL=debug, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            window = config.cooccurrence_window,
            vocabulary = ?config.vocabulary_file,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Like [`load`](Self::load), but fails when no config file exists.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let found: Vec<Utf8PathBuf> = APP_NAMES
                .iter()
                .flat_map(|name| [format!(".{name}"), (*name).to_string()])
                .flat_map(|base| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| format!("{base}.{ext}"))
                })
                .map(|file| dir.join(file))
                .filter(|path| path.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config beside the marker still counts.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// The user config directory (`~/.config/futuresness/` on Linux).
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}
