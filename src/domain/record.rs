// ============================================================
// Layer 3 — Record Types
// ============================================================
// A record is one labelled example exactly as stored on disk,
// before any feature extraction.

/// One image from the digit set: row-major grayscale pixels plus
/// the digit it depicts (0–9). Borrowed from the in-memory set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRecord<'a> {
    pub pixels: &'a [u8],
    pub label:  u8,
}

/// One review line after sanitising and tokenising.
///
/// `label` is `None` when the label column is missing or is not a
/// non-negative integer. Such lines still feed the vocabulary but
/// never become examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub tokens: Vec<String>,
    pub label:  Option<usize>,
}

impl TextRecord {
    pub fn new(tokens: Vec<String>, label: Option<usize>) -> Self {
        Self { tokens, label }
    }

    /// Tokens at least `min_len` characters long, in sentence order.
    pub fn long_tokens(&self, min_len: usize) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(move |t| t.len() >= min_len)
    }
}
