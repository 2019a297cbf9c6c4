//! Plain-text extraction from uploaded documents.
//!
//! The format is chosen by file extension. Extraction is best effort: a
//! corrupt or unreadable document yields an empty string and a warning, and
//! the caller decides whether empty input is an error.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::markdown::markdown_to_text;

/// Document formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain text; also the fallback for unknown extensions.
    PlainText,
    /// Markdown, rendered to prose.
    Markdown,
    /// PDF, text taken page by page.
    Pdf,
    /// Word document, paragraphs of `word/document.xml`.
    Docx,
}

impl DocumentFormat {
    /// Pick a format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" => Self::Markdown,
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            _ => Self::PlainText,
        }
    }
}

/// Extract analyzable text from a document's bytes.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    let format = DocumentFormat::from_filename(filename);
    let result = match format {
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentFormat::Markdown => Ok(markdown_to_text(&String::from_utf8_lossy(bytes))),
        DocumentFormat::Pdf => pdf_text(bytes),
        DocumentFormat::Docx => docx_text(bytes),
    };

    match result {
        Ok(text) => {
            tracing::debug!(?format, chars = text.chars().count(), "extracted text");
            text
        }
        Err(reason) => {
            tracing::warn!(?format, %reason, "text extraction failed");
            String::new()
        }
    }
}

fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
    let mut pages = Vec::new();
    for page_num in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => tracing::warn!(page = page_num, error = %e, "skipping unreadable pdf page"),
        }
    }
    Ok(pages.join("\n"))
}

fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("cannot find word/document.xml: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;
    document_xml_text(&xml)
}

/// Paragraph text of a WordprocessingML body, one paragraph per line.
fn document_xml_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => current.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br") {
                    current.push(' ');
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "xml error at position {}: {e}",
                    reader.buffer_position()
                ));
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
