//! Error types for futuresness-core.
//!
//! Analysis itself never fails: empty text, a non-positive co-occurrence
//! window, or a document without matches all produce a valid report. The
//! errors here cover configuration, vocabulary loading, export, and input
//! admission.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or compiling a vocabulary.
///
/// These are load-time failures and are fatal to startup; they are never
/// produced while analyzing a document.
#[derive(Error, Debug)]
pub enum VocabularyError {
    /// The taxonomy has no categories at all.
    #[error("vocabulary has no categories")]
    NoCategories,

    /// A category has an empty or whitespace-only name.
    #[error("category #{index} has an empty name")]
    EmptyCategoryName {
        /// Zero-based position of the category in the taxonomy.
        index: usize,
    },

    /// A term is empty or whitespace-only.
    #[error("category \"{category}\" has an empty term at position {index}")]
    EmptyTerm {
        /// Category the term belongs to.
        category: String,
        /// Zero-based position of the term within its category.
        index: usize,
    },

    /// The vocabulary file could not be read or parsed.
    #[error("failed to load vocabulary: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The term automaton could not be built.
    #[error("failed to compile vocabulary matcher: {0}")]
    Automaton(String),
}

/// Result type alias using [`VocabularyError`].
pub type VocabularyResult<T> = Result<T, VocabularyError>;

/// Errors that can occur while exporting a report.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV writer produced bytes that are not UTF-8.
    #[error("csv output is not valid UTF-8")]
    Encoding,
}

/// Result type alias using [`ExportError`].
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised when admitting input text for analysis.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input exceeds the configured character limit.
    #[error("input too large: {chars} characters (limit: {limit})")]
    TooLarge {
        /// Number of characters in the input.
        chars: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The input is empty or whitespace-only.
    #[error("no text to analyze")]
    Empty,
}
