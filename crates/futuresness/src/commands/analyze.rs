//! Analyze command: vocabulary analysis of one document.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use futuresness_core::config::Config;
use futuresness_core::{AnalysisReport, AnalyzeOptions, approach, export};

/// Output format for `analyze`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary.
    #[default]
    Text,
    /// Full report as JSON, with a document preview.
    Json,
    /// Matched terms as CSV.
    Csv,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Document to analyze (txt, md, pdf, docx). Reads stdin when omitted.
    #[arg(conflicts_with = "text")]
    pub file: Option<Utf8PathBuf>,

    /// Analyze this text instead of a file.
    #[arg(long)]
    pub text: Option<String>,

    /// Co-occurrence window in characters.
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub window: Option<i64>,

    /// Leave context snippets out of the report.
    #[arg(long)]
    pub no_snippets: bool,

    /// Output format (`--json` is shorthand for `--format json`).
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Vocabulary file replacing the built-in taxonomy.
    #[arg(long, value_name = "FILE")]
    pub vocabulary: Option<Utf8PathBuf>,
}

/// Analyze a document and print the report.
#[instrument(name = "cmd_analyze", skip_all, fields(file = ?args.file))]
pub fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = ?args.file, window = ?args.window, "executing analyze command");

    let limit = config.input_limit();
    let (text, source) = match (&args.file, &args.text) {
        (Some(path), _) => (super::read_input_file(path, limit)?, path.to_string()),
        (None, Some(text)) => (text.clone(), "text".to_string()),
        (None, None) => (super::read_stdin()?, "stdin".to_string()),
    };
    super::admit(&text, limit, &source)?;

    let analyzer = super::load_analyzer(args.vocabulary.as_deref(), config)?;
    let defaults = config.analyze_options();
    let options = AnalyzeOptions {
        cooccurrence_window: args.window.unwrap_or(defaults.cooccurrence_window),
        snippet_context: if args.no_snippets {
            None
        } else {
            defaults.snippet_context
        },
    };
    let report = analyzer.analyze(&text, &options);

    let format = if global_json {
        OutputFormat::Json
    } else {
        args.format.unwrap_or_default()
    };
    match format {
        OutputFormat::Json => {
            let json = export::report_json(&report, &text).context("failed to render JSON")?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            let csv = export::terms_csv(&report.term_matches).context("failed to render CSV")?;
            print!("{csv}");
        }
        OutputFormat::Text => print_summary(&source, &report),
    }

    Ok(())
}

fn print_summary(source: &str, report: &AnalysisReport) {
    let stats = &report.statistics;
    println!("{}", source.bold());

    if report.term_matches.is_empty() {
        println!(
            "\n  {} ({} words)",
            "No futures vocabulary found.".yellow(),
            stats.word_count
        );
        return;
    }

    println!(
        "\n  {} {} total, {} unique in {} words",
        "Terms:".cyan(),
        stats.total_terms,
        stats.unique_terms,
        stats.word_count,
    );
    println!(
        "  {} {:.2}% ({:.1} per 1000 words)",
        "Density:".cyan(),
        stats.density,
        stats.normalized_per_1000,
    );
    println!(
        "  {} {:.0}% of categories",
        "Coverage:".cyan(),
        stats.category_coverage_percent,
    );

    println!("\n  {}", "Categories".bold());
    for (category, count) in &stats.category_distribution {
        println!("    {category}: {count}");
    }

    println!("\n  {}", "Top terms".bold());
    for m in stats.top_terms.iter().take(10) {
        println!(
            "    {} {} {}",
            m.term.green(),
            format!("x{}", m.frequency).bold(),
            format!("({})", m.category).dimmed(),
        );
    }

    if !report.co_occurrences.is_empty() {
        println!("\n  {}", "Co-occurrences".bold());
        for c in report.co_occurrences.iter().take(10) {
            println!("    {} + {}: {}", c.pair[0], c.pair[1], c.count);
        }
    }

    if let Some((name, score)) = approach::dominant(&report.approach_scores) {
        println!("\n  {}", "Approaches".bold());
        for (approach, score) in &report.approach_scores {
            println!(
                "    {approach}: {score} ({:.0}%)",
                approach::share_percent(*score, stats.total_terms)
            );
        }
        println!("  {} {} ({score})", "Dominant:".cyan(), name.green());
    }

    if !report.clusters.is_empty() {
        println!("\n  {}", "Clusters".bold());
        for (id, terms) in report.clusters.iter().enumerate() {
            println!("    #{id}: {}", terms.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_analyzes() {
        let args = AnalyzeArgs {
            text: Some("Scenario planning and backcasting.".to_string()),
            ..AnalyzeArgs::default()
        };
        assert!(cmd_analyze(args, false, &Config::default()).is_ok());
    }

    #[test]
    fn blank_text_is_rejected() {
        let args = AnalyzeArgs {
            text: Some("   ".to_string()),
            ..AnalyzeArgs::default()
        };
        let err = cmd_analyze(args, false, &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("no text to analyze"));
    }

    #[test]
    fn input_limit_is_enforced() {
        let args = AnalyzeArgs {
            text: Some("delphi method".to_string()),
            ..AnalyzeArgs::default()
        };
        let config = Config {
            max_input_chars: Some(5),
            ..Config::default()
        };
        let err = cmd_analyze(args, false, &config).unwrap_err();
        assert!(format!("{err:#}").contains("input too large"));
    }

    #[test]
    fn missing_vocabulary_file_fails() {
        let args = AnalyzeArgs {
            text: Some("delphi".to_string()),
            vocabulary: Some(Utf8PathBuf::from("/nonexistent/vocabulary.yaml")),
            ..AnalyzeArgs::default()
        };
        assert!(cmd_analyze(args, true, &Config::default()).is_err());
    }
}
