//! CSV and JSON export of analysis results.

use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::reports::{AnalysisReport, TermMatch};

/// Snippets included per term in CSV output.
pub const CSV_SNIPPETS_PER_TERM: usize = 3;

/// Separator between snippets in a CSV cell.
pub const CSV_SNIPPET_SEPARATOR: &str = " ||| ";

/// Characters of the source document kept in the JSON preview.
pub const DOCUMENT_PREVIEW_CHARS: usize = 500;

/// Render matched terms as CSV with a `term,category,frequency,snippets` header.
pub fn terms_csv(matches: &[TermMatch]) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["term", "category", "frequency", "snippets"])?;
    for m in matches {
        let snippets = m
            .snippets
            .as_deref()
            .unwrap_or_default()
            .iter()
            .take(CSV_SNIPPETS_PER_TERM)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(CSV_SNIPPET_SEPARATOR);
        writer.write_record([
            m.term.as_str(),
            m.category.as_str(),
            &m.frequency.to_string(),
            &snippets,
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

#[derive(Serialize)]
struct ExportedReport<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    document_preview: String,
}

/// Render a report as pretty JSON, with a preview of the analyzed document.
pub fn report_json(report: &AnalysisReport, text: &str) -> ExportResult<String> {
    let exported = ExportedReport {
        report,
        document_preview: document_preview(text),
    };
    Ok(serde_json::to_string_pretty(&exported)?)
}

/// The first [`DOCUMENT_PREVIEW_CHARS`] characters, with `...` if cut.
pub fn document_preview(text: &str) -> String {
    match text.char_indices().nth(DOCUMENT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzeOptions, Analyzer};

    fn tm(term: &str, snippets: Option<Vec<&str>>) -> TermMatch {
        TermMatch {
            term: term.to_string(),
            category: "Foresight Methods".to_string(),
            frequency: 2,
            positions: vec![0, 10],
            snippets: snippets.map(|s| s.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn csv_header_and_rows() {
        let csv = terms_csv(&[tm("delphi", Some(vec!["a", "b", "c", "d"]))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("term,category,frequency,snippets"));
        assert_eq!(lines.next(), Some("delphi,Foresight Methods,2,a ||| b ||| c"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_without_snippets_has_empty_cell() {
        let csv = terms_csv(&[tm("delphi", None)]).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",2,"));
    }

    #[test]
    fn csv_quotes_commas() {
        let csv = terms_csv(&[tm("delphi", Some(vec!["x, y"]))]).unwrap();
        assert!(csv.contains("\"x, y\""));
    }

    #[test]
    fn csv_empty_is_header_only() {
        assert_eq!(terms_csv(&[]).unwrap(), "term,category,frequency,snippets\n");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "é".repeat(DOCUMENT_PREVIEW_CHARS + 10);
        let preview = document_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), DOCUMENT_PREVIEW_CHARS + 3);
        assert_eq!(document_preview("short"), "short");
        let exact = "a".repeat(DOCUMENT_PREVIEW_CHARS);
        assert_eq!(document_preview(&exact), exact);
    }

    #[test]
    fn json_flattens_report_and_adds_preview() {
        let text = "Scenario planning and backcasting.";
        let report = Analyzer::builtin()
            .unwrap()
            .analyze(text, &AnalyzeOptions::default());
        let json: serde_json::Value = serde_json::from_str(&report_json(&report, text).unwrap()).unwrap();
        assert_eq!(json["document_preview"], text);
        assert!(json["statistics"]["total_terms"].as_u64().unwrap() >= 2);
        assert!(json["term_matches"].is_array());
        assert!(json.get("report").is_none());
    }
}
