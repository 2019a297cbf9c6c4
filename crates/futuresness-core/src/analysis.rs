//! Vocabulary analysis of a single document.
//!
//! [`Analyzer`] owns the vocabulary and its compiled [`Matcher`]; both are
//! built once and only read afterwards, so one analyzer can serve any number
//! of documents, from any number of threads. [`Analyzer::analyze`] is a pure
//! function of the text and options.

use serde::{Deserialize, Serialize};

use crate::approach;
use crate::clusters;
use crate::cooccurrence::{self, DEFAULT_COOCCURRENCE_WINDOW};
use crate::error::{InputError, VocabularyResult};
use crate::matcher::{DEFAULT_SNIPPET_CONTEXT, Matcher};
use crate::reports::{AnalysisReport, REPORT_VERSION};
use crate::stats;
use crate::vocabulary::Vocabulary;

/// Per-request analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Maximum character distance for two terms to co-occur.
    pub cooccurrence_window: i64,
    /// Characters of context per snippet; `None` skips snippets.
    pub snippet_context: Option<usize>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            cooccurrence_window: DEFAULT_COOCCURRENCE_WINDOW,
            snippet_context: Some(DEFAULT_SNIPPET_CONTEXT),
        }
    }
}

/// Admit `text` for analysis, returning its length in characters.
///
/// Rejects blank input and input longer than `limit` characters; `None`
/// means no limit. The analyzer itself accepts anything, so callers that
/// want these rules apply them first.
pub fn check_input(text: &str, limit: Option<usize>) -> Result<usize, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::Empty);
    }
    let chars = text.chars().count();
    match limit {
        Some(limit) if chars > limit => Err(InputError::TooLarge { chars, limit }),
        _ => Ok(chars),
    }
}

/// Analyzes documents against a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct Analyzer {
    vocabulary: Vocabulary,
    matcher: Matcher,
}

impl Analyzer {
    /// Compile `vocabulary` into an analyzer.
    pub fn new(vocabulary: Vocabulary) -> VocabularyResult<Self> {
        let matcher = Matcher::new(&vocabulary.flatten())?;
        Ok(Self {
            vocabulary,
            matcher,
        })
    }

    /// An analyzer over the built-in taxonomy.
    pub fn builtin() -> VocabularyResult<Self> {
        Self::new(Vocabulary::builtin())
    }

    /// The vocabulary this analyzer matches against.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Analyze one document.
    ///
    /// Never fails: empty text, no matches, or a non-positive window all
    /// produce a valid (possibly empty) report.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn analyze(&self, text: &str, options: &AnalyzeOptions) -> AnalysisReport {
        let term_matches = self.matcher.find(text, options.snippet_context);
        let statistics = stats::aggregate(&term_matches, text, self.vocabulary.category_count());
        let co_occurrences = cooccurrence::co_occurrences(&term_matches, options.cooccurrence_window);
        let approach_scores = approach::classify(&term_matches);
        let cluster_set = clusters::build_clusters(&co_occurrences);
        let word_frequencies = term_matches
            .iter()
            .map(|m| (m.term.clone(), m.frequency))
            .collect();

        tracing::info!(
            total_terms = statistics.total_terms,
            unique_terms = statistics.unique_terms,
            pairs = co_occurrences.len(),
            clusters = cluster_set.clusters.len(),
            "analysis complete"
        );

        AnalysisReport {
            version: REPORT_VERSION,
            statistics,
            term_matches,
            co_occurrences,
            approach_scores,
            word_frequencies,
            clusters: cluster_set.clusters,
            term_cluster_map: cluster_set.term_cluster_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> Analyzer {
        Analyzer::builtin().unwrap()
    }

    #[test]
    fn empty_text_gives_empty_report() {
        let report = analyzer().analyze("", &AnalyzeOptions::default());
        assert_eq!(report.version, REPORT_VERSION);
        assert!(report.term_matches.is_empty());
        assert_eq!(report.statistics.total_terms, 0);
        assert_eq!(report.statistics.density, 0.0);
        assert!(report.co_occurrences.is_empty());
        assert!(report.approach_scores.is_empty());
        assert!(report.clusters.is_empty());
    }

    #[test]
    fn text_without_vocabulary_is_success() {
        let report = analyzer().analyze("The cat sat on the mat.", &AnalyzeOptions::default());
        assert!(report.term_matches.is_empty());
        assert_eq!(report.statistics.word_count, 6);
    }

    #[test]
    fn word_frequencies_mirror_matches() {
        let report = analyzer().analyze(
            "futures futures futures scenario planning backcasting",
            &AnalyzeOptions::default(),
        );
        assert_eq!(report.word_frequencies["futures"], 3);
        assert_eq!(report.word_frequencies.len(), report.term_matches.len());
    }

    #[test]
    fn snippets_follow_options() {
        let options = AnalyzeOptions {
            snippet_context: None,
            ..AnalyzeOptions::default()
        };
        let report = analyzer().analyze("backcasting", &options);
        assert!(report.term_matches[0].snippets.is_none());

        let report = analyzer().analyze("backcasting", &AnalyzeOptions::default());
        assert!(report.term_matches[0].snippets.is_some());
    }

    #[test]
    fn report_serializes_with_snake_case_fields() {
        let report = analyzer().analyze("horizon scanning", &AnalyzeOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["statistics"]["total_terms"].is_u64());
        assert!(json["term_matches"].is_array());
        assert!(json["term_cluster_map"].is_object());
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn check_input_rules() {
        assert!(matches!(check_input("", None), Err(InputError::Empty)));
        assert!(matches!(check_input(" \n\t", Some(10)), Err(InputError::Empty)));
        assert_eq!(check_input("délphi", Some(6)).unwrap(), 6);
        assert!(matches!(
            check_input("delphi method", Some(6)),
            Err(InputError::TooLarge { chars: 13, limit: 6 })
        ));
        assert_eq!(check_input("delphi method", None).unwrap(), 13);
    }

    #[test]
    fn analyzer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
    }
}
