//! Whole-word vocabulary matching.
//!
//! All terms are compiled into one Aho-Corasick automaton and the document is
//! scanned once with overlapping iteration, so every candidate occurrence of
//! every term is seen. Candidates are then filtered per term:
//!
//! - both ends must sit on a word boundary (a non-word character or the
//!   edge of the text), so "future" never matches inside "futures";
//! - occurrences of the same term may not overlap each other, mirroring a
//!   left-to-right scan that resumes after each hit.
//!
//! Different terms are independent. "scenario planning" and a vocabulary
//! entry "planning" both count the same span; nested terms are not
//! suppressed.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::{VocabularyError, VocabularyResult};
use crate::fold::{FoldedText, is_word_char};
use crate::reports::TermMatch;
use crate::vocabulary::{FlattenedVocabulary, VocabularyTerm};

/// Default number of characters of context on each side of a snippet.
pub const DEFAULT_SNIPPET_CONTEXT: usize = 60;

/// A compiled vocabulary, ready to scan documents.
#[derive(Debug, Clone)]
pub struct Matcher {
    terms: Vec<VocabularyTerm>,
    automaton: AhoCorasick,
}

impl Matcher {
    /// Compile the flattened vocabulary into a matcher.
    pub fn new(vocabulary: &FlattenedVocabulary) -> VocabularyResult<Self> {
        let terms = vocabulary.terms().to_vec();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(terms.iter().map(|t| t.text.as_str()))
            .map_err(|e| VocabularyError::Automaton(e.to_string()))?;
        tracing::debug!(terms = terms.len(), "compiled vocabulary matcher");
        Ok(Self { terms, automaton })
    }

    /// Terms in scan order.
    pub fn terms(&self) -> &[VocabularyTerm] {
        &self.terms
    }

    /// Find every whole-word occurrence of every term in `text`.
    ///
    /// Returns one [`TermMatch`] per term found, in vocabulary scan order
    /// (longest terms first). Positions are character offsets. When
    /// `snippet_context` is set, each occurrence also gets that many
    /// characters of original-case context on either side.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), terms = self.terms.len()))]
    pub fn find(&self, text: &str, snippet_context: Option<usize>) -> Vec<TermMatch> {
        if text.is_empty() || self.terms.is_empty() {
            return Vec::new();
        }

        let doc = FoldedText::new(text);
        let mut spans: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.terms.len()];

        // Overlapping matches arrive ordered by end offset, which for a single
        // pattern is also start order.
        for hit in self.automaton.find_overlapping_iter(doc.folded()) {
            let start = doc.char_index(hit.start());
            let end = doc.char_index(hit.end());
            if !on_word_boundaries(&doc, start, end) {
                continue;
            }
            let accepted = &mut spans[hit.pattern().as_usize()];
            if accepted.last().is_none_or(|&(_, last_end)| start >= last_end) {
                accepted.push((start, end));
            }
        }

        let matches: Vec<TermMatch> = self
            .terms
            .iter()
            .zip(spans)
            .filter(|(_, occurrences)| !occurrences.is_empty())
            .map(|(term, occurrences)| {
                let snippets = snippet_context.map(|context| {
                    occurrences
                        .iter()
                        .map(|&(start, end)| {
                            doc.original_slice(
                                start.saturating_sub(context),
                                end.saturating_add(context),
                            )
                            .trim()
                            .to_string()
                        })
                        .collect()
                });
                TermMatch {
                    term: term.text.clone(),
                    category: term.category.clone(),
                    frequency: occurrences.len(),
                    positions: occurrences.iter().map(|&(start, _)| start).collect(),
                    snippets,
                }
            })
            .collect();

        tracing::debug!(unique_terms = matches.len(), "matching complete");
        matches
    }
}

/// Whether the span `[start, end)` is bounded by non-word characters or edges.
fn on_word_boundaries(doc: &FoldedText<'_>, start: usize, end: usize) -> bool {
    let before_ok = start == 0 || doc.char_at(start - 1).is_none_or(|c| !is_word_char(c));
    let after_ok = doc.char_at(end).is_none_or(|c| !is_word_char(c));
    before_ok && after_ok
}
