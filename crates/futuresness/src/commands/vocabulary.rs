//! Vocabulary command: show the taxonomy in use.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use futuresness_core::Vocabulary;
use futuresness_core::config::Config;

/// Arguments for the `vocabulary` subcommand.
#[derive(Args, Debug, Default)]
pub struct VocabularyArgs {
    /// Vocabulary file to show instead of the configured one.
    #[arg(long, value_name = "FILE")]
    pub vocabulary: Option<Utf8PathBuf>,

    /// List every term, not just counts.
    #[arg(long)]
    pub terms: bool,
}

#[derive(Serialize)]
struct CategorySummary<'a> {
    name: &'a str,
    term_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms: Option<&'a [String]>,
}

#[derive(Serialize)]
struct VocabularySummary<'a> {
    source: String,
    category_count: usize,
    term_count: usize,
    categories: Vec<CategorySummary<'a>>,
}

impl<'a> VocabularySummary<'a> {
    fn new(vocabulary: &'a Vocabulary, source: String, with_terms: bool) -> Self {
        let categories = vocabulary
            .categories()
            .iter()
            .map(|c| CategorySummary {
                name: &c.name,
                term_count: c.terms.len(),
                terms: with_terms.then_some(c.terms.as_slice()),
            })
            .collect();
        Self {
            source,
            category_count: vocabulary.category_count(),
            term_count: vocabulary.term_count(),
            categories,
        }
    }
}

/// Print vocabulary categories with their term counts.
#[instrument(name = "cmd_vocabulary", skip_all)]
pub fn cmd_vocabulary(
    args: VocabularyArgs,
    global_json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    debug!(file = ?args.vocabulary, terms = args.terms, "executing vocabulary command");

    let vocabulary = super::load_vocabulary(args.vocabulary.as_deref(), config)?;
    let source = args
        .vocabulary
        .as_ref()
        .or(config.vocabulary_file.as_ref())
        .map_or_else(|| "built-in".to_string(), ToString::to_string);
    let summary = VocabularySummary::new(&vocabulary, source, args.terms);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} ({} categories, {} terms)",
        "Vocabulary:".bold(),
        summary.source.cyan(),
        summary.category_count,
        summary.term_count,
    );
    for category in &summary.categories {
        println!(
            "\n  {} {}",
            category.name.green(),
            format!("({})", category.term_count).dimmed()
        );
        if let Some(terms) = category.terms {
            for term in terms {
                println!("    {term}");
            }
        }
    }

    Ok(())
}
