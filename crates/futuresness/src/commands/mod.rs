//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;
use futuresness_core::config::Config;
use futuresness_core::{Analyzer, Vocabulary, check_input, extract};

pub mod analyze;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod vocabulary;

/// Bytes per character assumed when pre-checking file sizes.
const MAX_BYTES_PER_CHAR: u64 = 4;

/// Read a document and extract its text.
///
/// Rejects files whose size alone proves they exceed `max_chars`. The exact
/// character limit is enforced on the extracted text by [`admit`].
pub fn read_input_file(path: &Utf8Path, max_chars: Option<usize>) -> anyhow::Result<String> {
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_chars
        && metadata.len() > (max as u64).saturating_mul(MAX_BYTES_PER_CHAR)
        && !is_container(path)
    {
        anyhow::bail!(
            "input too large: {path} is {} bytes (limit: {max} characters)",
            metadata.len()
        );
    }

    let bytes = std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    Ok(extract::extract_text(&bytes, path.as_str()))
}

/// Read all of standard input as (lossy) UTF-8.
pub fn read_stdin() -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read standard input")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Apply the input rules to text about to be analyzed.
pub fn admit(text: &str, max_chars: Option<usize>, source: &str) -> anyhow::Result<()> {
    check_input(text, max_chars).with_context(|| format!("cannot analyze {source}"))?;
    Ok(())
}

/// Build an analyzer from an explicit vocabulary file, the configured one,
/// or the built-in taxonomy.
pub fn load_analyzer(explicit: Option<&Utf8Path>, config: &Config) -> anyhow::Result<Analyzer> {
    let vocabulary = load_vocabulary(explicit, config)?;
    Analyzer::new(vocabulary).context("failed to compile vocabulary")
}

/// Load the vocabulary the same way [`load_analyzer`] does.
pub fn load_vocabulary(explicit: Option<&Utf8Path>, config: &Config) -> anyhow::Result<Vocabulary> {
    match explicit.or(config.vocabulary_file.as_deref()) {
        Some(path) => {
            Vocabulary::from_file(path).with_context(|| format!("failed to load vocabulary {path}"))
        }
        None => Ok(Vocabulary::builtin()),
    }
}

/// Compressed formats whose size on disk says little about their text.
fn is_container(path: &Utf8Path) -> bool {
    matches!(
        extract::DocumentFormat::from_filename(path.as_str()),
        extract::DocumentFormat::Pdf | extract::DocumentFormat::Docx
    )
}
