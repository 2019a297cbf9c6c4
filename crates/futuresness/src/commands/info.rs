//! Info command implementation

use clap::Args;
use futuresness_core::config::{Config, ConfigSources};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    cooccurrence_window: i64,
    snippet_context: usize,
    include_snippets: bool,
    vocabulary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_chars: Option<usize>,
    cache_capacity: usize,
    cache_ttl_secs: u64,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            cooccurrence_window: config.cooccurrence_window,
            snippet_context: config.snippet_context,
            include_snippets: config.include_snippets,
            vocabulary: config
                .vocabulary_file
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |p| p.to_string()),
            max_input_chars: config.input_limit(),
            cache_capacity: config.cache_capacity,
            cache_ttl_secs: config.cache_ttl_secs,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.package.name.bold(), info.package.version.green());
    if !info.package.description.is_empty() {
        println!("{}", info.package.description);
    }
    if !info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), info.package.license);
    }
    if !info.package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), info.package.repository.cyan());
    }

    let c = &info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match c.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), c.log_level);
    if let Some(ref dir) = c.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Analysis".bold().underline());
    println!("{}: {}", "Vocabulary".dimmed(), c.vocabulary);
    println!("{}: {} characters", "Co-occurrence window".dimmed(), c.cooccurrence_window);
    if c.include_snippets {
        println!("{}: {} characters", "Snippet context".dimmed(), c.snippet_context);
    } else {
        println!("{}: {}", "Snippets".dimmed(), "off".yellow());
    }
    match c.max_input_chars {
        Some(limit) => println!("{}: {limit} characters", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }
    println!(
        "{}: {} reports, {}s",
        "Server cache".dimmed(),
        c.cache_capacity,
        c.cache_ttl_secs
    );

    Ok(())
}
