// ============================================================
// Layer 4 — Review Line Preprocessor
// ============================================================
// Turns one raw review line into a TextRecord.
//
// Cleaning steps (applied in order):
//   1. Drop every character that is not a–z, A–Z, the digits
//      0 and 1, a space, or a tab. Only 0 and 1 survive among
//      the digits; this matches the labels and is kept as-is.
//   2. Lower-case what is left
//   3. Split on tab into [sentence, label]
//   4. Split the sentence on single spaces into tokens
//
// Empty tokens from doubled spaces are kept; they are shorter
// than any minimum token length and fall out downstream.

use crate::domain::record::TextRecord;

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Whether `c` survives sanitising.
    fn keeps(c: char) -> bool {
        matches!(c, 'a'..='z' | 'A'..='Z' | '0' | '1' | ' ' | '\t')
    }

    /// Remove filtered characters and lower-case the rest.
    pub fn sanitize(&self, line: &str) -> String {
        line.chars()
            .filter(|&c| Self::keeps(c))
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Sanitise and split a `"<sentence>\t<label>"` line.
    pub fn parse_line(&self, line: &str) -> TextRecord {
        let clean = self.sanitize(line.trim_end_matches(['\n', '\r']));
        let mut columns = clean.split('\t');

        let tokens = columns
            .next()
            .unwrap_or_default()
            .split(' ')
            .map(str::to_owned)
            .collect();

        let label = columns.next().and_then(|raw| raw.parse::<usize>().ok());

        TextRecord::new(tokens, label)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
