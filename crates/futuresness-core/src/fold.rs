//! Length-preserving case folding.
//!
//! Match positions are reported as character offsets into the original
//! document, so folding must never change the number of characters. Each
//! character is replaced by its lowercase form only when that form is a
//! single character; characters whose lowercase expands (e.g. `İ`) are kept
//! as they are.

/// Lower-case one character without changing the character count.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Lower-case a string, one output character per input character.
pub fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Whether `c` counts as part of a word for boundary checks.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A case-folded document with offset tables back to the original.
#[derive(Debug)]
pub struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// Byte offset in `folded` of each character, plus a final end sentinel.
    folded_starts: Vec<usize>,
    /// Byte offset in `original` of each character, plus a final end sentinel.
    original_starts: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    /// Fold `original` and index its character boundaries.
    pub fn new(original: &'a str) -> Self {
        let capacity = original.len() + 1;
        let mut folded = String::with_capacity(original.len());
        let mut folded_starts = Vec::with_capacity(capacity);
        let mut original_starts = Vec::with_capacity(capacity);

        for (offset, c) in original.char_indices() {
            original_starts.push(offset);
            folded_starts.push(folded.len());
            folded.push(fold_char(c));
        }
        original_starts.push(original.len());
        folded_starts.push(folded.len());

        Self {
            original,
            folded,
            folded_starts,
            original_starts,
        }
    }

    /// The folded text.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Number of characters in the document.
    pub fn char_len(&self) -> usize {
        self.folded_starts.len() - 1
    }

    /// Character index of a byte offset in the folded text.
    ///
    /// `byte` must lie on a character boundary of the folded text.
    pub fn char_index(&self, byte: usize) -> usize {
        self.folded_starts
            .binary_search(&byte)
            .unwrap_or_else(|insert_at| insert_at)
    }

    /// Character at character index `idx`, if any.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        let start = *self.folded_starts.get(idx)?;
        self.folded[start..].chars().next()
    }

    /// Slice of the original (unfolded) text between two character indices.
    pub fn original_slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.char_len());
        let start = start.min(end);
        &self.original[self.original_starts[start]..self.original_starts[end]]
    }
}
