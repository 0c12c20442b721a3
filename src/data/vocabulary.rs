// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Maps each qualifying token to a dense index for bag-of-words
// sentence vectors. Indices are handed out in first-seen order
// across the review files, in the order the files are given, so
// the same file list always yields the same map.

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::data::preprocessor::Preprocessor;
use crate::data::reviews::ReviewLines;
use crate::domain::traits::ProgressObserver;

/// Tokens shorter than this never enter the vocabulary.
pub const MIN_TOKEN_LEN: usize = 4;

/// Token-to-index vocabulary. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Tokens in index order.
    tokens: Vec<String>,
    /// Reverse mapping from token to index.
    index: HashMap<String, usize>,
    min_token_len: usize,
}

impl Vocabulary {
    /// Number of tokens in the vocabulary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Minimum token length used while building.
    #[must_use]
    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// Index of `token`, or `None` if it never qualified.
    #[must_use]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// `(token, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tokens.iter().enumerate().map(|(i, t)| (t.as_str(), i))
    }
}

/// Accumulates tokens into a [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
    min_token_len: usize,
}

impl VocabularyBuilder {
    #[must_use]
    pub fn new(min_token_len: usize) -> Self {
        Self { tokens: Vec::new(), index: HashMap::new(), min_token_len }
    }

    /// Add every qualifying token not seen before, in order.
    pub fn observe<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) {
        for token in tokens {
            if token.len() < self.min_token_len || self.index.contains_key(token) {
                continue;
            }
            self.index.insert(token.to_owned(), self.tokens.len());
            self.tokens.push(token.to_owned());
        }
    }

    /// Scan one review file line by line. Lines are used whether or
    /// not their label parses.
    pub fn observe_file(
        &mut self,
        path: &Path,
        preprocessor: &Preprocessor,
        progress: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let before = self.tokens.len();
        progress.begin(&format!("vocabulary < {} >", path.display()), None);

        let mut lines = 0usize;
        for line in ReviewLines::open(path)? {
            let record = preprocessor.parse_line(&line?);
            self.observe(record.tokens.iter().map(String::as_str));
            lines += 1;
            progress.advance(lines);
        }

        progress.finish(lines);
        tracing::debug!(
            "Added {} words from '{}' ({} lines)",
            self.tokens.len() - before,
            path.display(),
            lines
        );
        Ok(())
    }

    #[must_use]
    pub fn build(self) -> Vocabulary {
        Vocabulary {
            tokens: self.tokens,
            index: self.index,
            min_token_len: self.min_token_len,
        }
    }
}

/// Build the vocabulary from `paths`, processed in the given order.
pub fn build_vocabulary(
    paths: &[PathBuf],
    preprocessor: &Preprocessor,
    min_token_len: usize,
    progress: &mut dyn ProgressObserver,
) -> Result<Vocabulary> {
    let mut builder = VocabularyBuilder::new(min_token_len);
    for path in paths {
        builder.observe_file(path, preprocessor, progress)?;
    }
    let vocab = builder.build();
    tracing::info!("Vocabulary holds {} words", vocab.len());

    let first: Vec<&str> = vocab.iter().take(8).map(|(token, _)| token).collect();
    tracing::debug!("First words: {:?}", first);
    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Silent;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_first_seen_order() {
        let mut b = VocabularyBuilder::new(MIN_TOKEN_LEN);
        b.observe("great product here".split(' '));
        b.observe("bad service here".split(' '));
        let vocab = b.build();

        let pairs: Vec<(&str, usize)> = vocab.iter().collect();
        assert_eq!(
            pairs,
            vec![("great", 0), ("product", 1), ("here", 2), ("service", 3)]
        );
    }

    #[test]
    fn test_short_tokens_never_added() {
        let mut b = VocabularyBuilder::new(MIN_TOKEN_LEN);
        b.observe(["a", "is", "bad", "", "okay"]);
        let vocab = b.build();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.index_of("bad"), None);
        assert_eq!(vocab.index_of("okay"), Some(0));
    }

    #[test]
    fn test_repeated_token_keeps_first_index() {
        let mut b = VocabularyBuilder::new(MIN_TOKEN_LEN);
        b.observe(["wonderful", "terrible", "wonderful"]);
        let vocab = b.build();
        assert_eq!(vocab.index_of("wonderful"), Some(0));
        assert_eq!(vocab.index_of("terrible"), Some(1));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_file_order_decides_indices() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write_file(&dir, "a.txt", "Loved this phone.\t1\n");
        let b = write_file(&dir, "b.txt", "Awful phone battery!\t0\n");
        let p = Preprocessor::new();

        let ab = build_vocabulary(&[a.clone(), b.clone()], &p, MIN_TOKEN_LEN, &mut Silent)?;
        let ba = build_vocabulary(&[b, a], &p, MIN_TOKEN_LEN, &mut Silent)?;

        assert_eq!(ab.index_of("loved"), Some(0));
        assert_eq!(ba.index_of("awful"), Some(0));
        assert_eq!(ab.len(), ba.len());
        Ok(())
    }

    #[test]
    fn test_rebuild_is_identical() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write_file(&dir, "a.txt", "Best purchase ever made\t1\nNever again, returned it\t0\n");
        let b = write_file(&dir, "b.txt", "Service was slow\t0\nlabel missing here\n");
        let p = Preprocessor::new();
        let paths = vec![a, b];

        let first = build_vocabulary(&paths, &p, MIN_TOKEN_LEN, &mut Silent)?;
        let second = build_vocabulary(&paths, &p, MIN_TOKEN_LEN, &mut Silent)?;
        assert_eq!(first, second);

        // Indices are dense: 0..len, each exactly once
        let mut indices: Vec<usize> = first.iter().map(|(_, i)| i).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..first.len()).collect::<Vec<_>>());

        // Lines without a label still contribute words
        assert!(first.index_of("missing").is_some());
        Ok(())
    }

    #[test]
    fn test_latin1_bytes_do_not_break_the_build() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("imdb.txt");
        std::fs::write(&path, b"Caf\xe9 was wonderful\t1\nGreat movie\t1\n")?;

        let vocab = build_vocabulary(&[path], &Preprocessor::new(), MIN_TOKEN_LEN, &mut Silent)?;
        // the stray byte is dropped by the sanitiser, leaving "caf"
        assert_eq!(vocab.index_of("caf"), None);
        assert_eq!(vocab.index_of("wonderful"), Some(0));
        assert_eq!(vocab.index_of("great"), Some(1));
        assert_eq!(vocab.index_of("movie"), Some(2));
        Ok(())
    }

    #[test]
    fn test_missing_file_propagates() {
        let p = Preprocessor::new();
        let res = build_vocabulary(
            &[PathBuf::from("/definitely/not/here.txt")],
            &p,
            MIN_TOKEN_LEN,
            &mut Silent,
        );
        assert!(res.is_err());
    }
}
