//! Core library for futuresness.
//!
//! Measures how much futures-studies vocabulary a document uses: which terms
//! of a categorized taxonomy occur and where, how densely, which terms appear
//! near each other, which methodological approaches they point to, and how
//! co-occurring terms cluster.
//!
//! # Modules
//!
//! - [`vocabulary`] - The term taxonomy and its flattened, longest-first form
//! - [`matcher`] - Whole-word, case-insensitive term location
//! - [`stats`] - Totals, density, category distribution, top terms
//! - [`cooccurrence`] - Windowed term pairs
//! - [`approach`] - Methodological approach scoring
//! - [`clusters`] - Connected components of the co-occurrence graph
//! - [`analysis`] - The [`Analyzer`] tying it together
//! - [`extract`] - Text from txt, markdown, pdf and docx files
//! - [`export`] - CSV and JSON output
//! - [`cache`] - Bounded TTL cache of reports
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use futuresness_core::{AnalyzeOptions, Analyzer};
//!
//! let analyzer = Analyzer::builtin().expect("built-in vocabulary is valid");
//! let report = analyzer.analyze(
//!     "Scenario planning and horizon scanning inform strategic foresight.",
//!     &AnalyzeOptions::default(),
//! );
//!
//! assert!(report.statistics.total_terms >= 3);
//! assert!(report.approach_scores.contains_key("Exploratory"));
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod approach;
pub mod cache;
pub mod clusters;
pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod export;
pub mod extract;
pub mod fold;
pub mod markdown;
pub mod matcher;
pub mod reports;
pub mod stats;
pub mod vocabulary;

pub use analysis::{AnalyzeOptions, Analyzer, check_input};
pub use cache::{CacheKey, ResultCache};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    ConfigError, ConfigResult, ExportError, ExportResult, InputError, VocabularyError,
    VocabularyResult,
};
pub use matcher::Matcher;
pub use reports::{AnalysisReport, CoOccurrence, Statistics, TermMatch};
pub use vocabulary::{Category, Vocabulary};
