//! Markdown to analyzable text.
//!
//! Uses pulldown-cmark to keep everything a reader would see as prose
//! (headings, paragraphs, list items, table cells, link text) while dropping
//! markup, code, and YAML frontmatter. Block ends become newlines so words
//! from adjacent blocks never run together.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Render markdown as plain text for vocabulary analysis.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn markdown_to_text(text: &str) -> String {
    let text = strip_frontmatter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);

    let mut result = String::with_capacity(text.len());
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Text(t) if !in_code_block => result.push_str(&t),
            Event::SoftBreak | Event::HardBreak => result.push(' '),

            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableRow,
            ) => result.push('\n'),
            Event::End(TagEnd::TableCell) => result.push(' '),

            _ => {}
        }
    }

    result
}

/// Drop a leading YAML frontmatter block delimited by `---` lines.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close_pos) = after_opening.find("\n---") else {
        return text;
    };
    let remainder = &after_opening[close_pos + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_headings() {
        let result = markdown_to_text("# Strategic Foresight\n\nBody text.");
        assert!(result.contains("Strategic Foresight"));
        assert!(result.contains("Body text."));
    }

    #[test]
    fn drops_code_blocks() {
        let result = markdown_to_text("Text.\n\n```\nscenario planning\n```\n\nMore.");
        assert!(!result.contains("scenario planning"));
        assert!(result.contains("More."));
    }

    #[test]
    fn drops_inline_code() {
        let result = markdown_to_text("Call `delphi()` now.");
        assert!(!result.contains("delphi"));
    }

    #[test]
    fn drops_frontmatter() {
        let result = markdown_to_text("---\ntitle: Futures\n---\n\nHorizon scanning.");
        assert!(!result.contains("title"));
        assert!(result.contains("Horizon scanning."));
    }

    #[test]
    fn keeps_link_text_not_url() {
        let result = markdown_to_text("See [weak signals](https://example.com/futures).");
        assert!(result.contains("weak signals"));
        assert!(!result.contains("example.com"));
    }

    #[test]
    fn blocks_do_not_run_together() {
        let result = markdown_to_text("- horizon\n- scanning");
        assert!(!result.contains("horizonscanning"));
        assert!(!result.contains("horizon scanning"));
    }

    #[test]
    fn table_cells_are_separated() {
        let result = markdown_to_text("| a | b |\n|---|---|\n| backcasting | delphi |\n");
        assert!(result.contains("backcasting"));
        assert!(result.contains("delphi"));
        assert!(!result.contains("backcastingdelphi"));
    }

    #[test]
    fn empty_input() {
        assert!(markdown_to_text("").is_empty());
    }
}
