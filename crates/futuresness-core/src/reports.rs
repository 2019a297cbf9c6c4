//! Report structs for vocabulary analysis.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! use in both CLI JSON output and MCP tool responses.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current shape of [`AnalysisReport`]. Bumped on any breaking field change.
pub const REPORT_VERSION: u32 = 1;

/// Full vocabulary analysis of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Report format version ([`REPORT_VERSION`]).
    pub version: u32,
    /// Aggregate counts, density, and category distribution.
    pub statistics: Statistics,
    /// One entry per vocabulary term found, in scan order.
    pub term_matches: Vec<TermMatch>,
    /// Most frequent co-occurring term pairs.
    pub co_occurrences: Vec<CoOccurrence>,
    /// Methodological approach scores, highest first.
    pub approach_scores: IndexMap<String, usize>,
    /// Term to frequency, in scan order.
    pub word_frequencies: IndexMap<String, usize>,
    /// Connected groups of co-occurring terms.
    pub clusters: Vec<Vec<String>>,
    /// Term to index into `clusters`.
    pub term_cluster_map: IndexMap<String, usize>,
}

// -- Matches ----------------------------------------------------------------

/// All occurrences of one vocabulary term in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TermMatch {
    /// Lower-cased term.
    pub term: String,
    /// Category the term belongs to.
    pub category: String,
    /// Number of occurrences (always at least 1).
    pub frequency: usize,
    /// Character offsets of each occurrence, ascending.
    pub positions: Vec<usize>,
    /// Original-case context around each occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets: Option<Vec<String>>,
}

// -- Statistics -------------------------------------------------------------

/// Aggregate statistics over all matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Statistics {
    /// Sum of all term frequencies.
    pub total_terms: usize,
    /// Number of distinct terms found.
    pub unique_terms: usize,
    /// Whitespace-delimited tokens in the raw text.
    pub word_count: usize,
    /// Term occurrences per 100 words.
    pub density: f64,
    /// Term occurrences per 1000 words.
    pub normalized_per_1000: f64,
    /// Summed frequency per category, in first-seen order.
    pub category_distribution: IndexMap<String, usize>,
    /// Percentage of vocabulary categories with at least one match.
    pub category_coverage_percent: f64,
    /// Most frequent terms (max 20).
    pub top_terms: Vec<TermMatch>,
}

// -- Co-occurrence ----------------------------------------------------------

/// Two terms found near each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoOccurrence {
    /// The two terms, sorted lexically.
    pub pair: [String; 2],
    /// Number of nearby occurrences.
    pub count: usize,
}

// -- Clusters ---------------------------------------------------------------

/// Connected components of the co-occurrence graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClusterSet {
    /// Terms per cluster, clusters in discovery order.
    pub clusters: Vec<Vec<String>>,
    /// Term to cluster index.
    pub term_cluster_map: IndexMap<String, usize>,
}
