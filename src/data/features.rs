// ============================================================
// Layer 4 — Feature Extraction
// ============================================================
// Converts one record into a fixed-length f32 vector.
//
//   ImageRecord ──PixelEncoder──▶ [f32; pixels]     (0/1 or value/255)
//   TextRecord  ──BagOfWords────▶ [f32; vocab len]  (one-hot per word)
//
// Both are pure: the same record and configuration always give
// a bit-identical vector.

use crate::data::vocabulary::Vocabulary;
use crate::domain::record::{ImageRecord, TextRecord};

/// Vocabularies smaller than this produce all-zero sentence vectors.
pub const MIN_VOCABULARY_LEN: usize = 4;

// ─── Pixels ───────────────────────────────────────────────────────────────────
/// How a raw 0–255 pixel becomes a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEncoding {
    /// 1.0 when the pixel is strictly above `threshold`, else 0.0
    Binarize { threshold: u8 },
    /// pixel / 255
    Grayscale,
}

impl PixelEncoding {
    pub fn encode(&self, value: u8) -> f32 {
        match *self {
            PixelEncoding::Binarize { threshold } => {
                if value > threshold { 1.0 } else { 0.0 }
            }
            PixelEncoding::Grayscale => f32::from(value) / 255.0,
        }
    }
}

/// Applies one PixelEncoding to whole images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelEncoder {
    encoding: PixelEncoding,
}

impl PixelEncoder {
    pub fn new(encoding: PixelEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> PixelEncoding {
        self.encoding
    }

    pub fn extract(&self, record: &ImageRecord<'_>) -> Vec<f32> {
        let mut features = vec![0.0f32; record.pixels.len()];
        for (slot, &value) in features.iter_mut().zip(record.pixels) {
            *slot = self.encoding.encode(value);
        }
        features
    }
}

// ─── Words ────────────────────────────────────────────────────────────────────
/// One-hot sentence encoder over a fixed vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct BagOfWords<'v> {
    vocab: &'v Vocabulary,
}

impl<'v> BagOfWords<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    /// Length of every vector this encoder produces.
    pub fn dimension(&self) -> usize {
        self.vocab.len()
    }

    pub fn extract(&self, record: &TextRecord) -> Vec<f32> {
        let mut features = vec![0.0f32; self.vocab.len()];
        if self.vocab.len() < MIN_VOCABULARY_LEN {
            return features;
        }

        for token in record.long_tokens(self.vocab.min_token_len()) {
            if let Some(idx) = self.vocab.index_of(token) {
                features[idx] = 1.0;
            }
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::Preprocessor;
    use crate::data::vocabulary::{VocabularyBuilder, MIN_TOKEN_LEN};

    fn vocab_of(sentences: &[&str]) -> Vocabulary {
        let mut b = VocabularyBuilder::new(MIN_TOKEN_LEN);
        for s in sentences {
            b.observe(s.split(' '));
        }
        b.build()
    }

    #[test]
    fn test_binarize_threshold_is_strict() {
        let pixels = [210u8, 200, 0, 255];
        let rec = ImageRecord { pixels: &pixels, label: 3 };

        let at_200 = PixelEncoder::new(PixelEncoding::Binarize { threshold: 200 }).extract(&rec);
        assert_eq!(at_200, vec![1.0, 0.0, 0.0, 1.0]);

        let at_220 = PixelEncoder::new(PixelEncoding::Binarize { threshold: 220 }).extract(&rec);
        assert_eq!(at_220, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_grayscale_scales_to_unit_range() {
        let pixels = [0u8, 51, 255];
        let rec = ImageRecord { pixels: &pixels, label: 0 };
        let v = PixelEncoder::new(PixelEncoding::Grayscale).extract(&rec);
        assert_eq!(v[0], 0.0);
        assert!((v[1] - 0.2).abs() < 1e-6);
        assert_eq!(v[2], 1.0);
    }

    #[test]
    fn test_image_vector_length_matches_pixels() {
        let pixels = vec![0u8; 784];
        let rec = ImageRecord { pixels: &pixels, label: 7 };
        let v = PixelEncoder::new(PixelEncoding::Binarize { threshold: 167 }).extract(&rec);
        assert_eq!(v.len(), 784);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_sentence_sets_exactly_its_words() {
        let vocab = vocab_of(&["great product here", "bad service here"]);
        let bow = BagOfWords::new(&vocab);
        let p = Preprocessor::new();

        let first = bow.extract(&p.parse_line("great product here\t1"));
        assert_eq!(first, vec![1.0, 1.0, 1.0, 0.0]);

        let second = bow.extract(&p.parse_line("bad service here\t0"));
        assert_eq!(second, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_unknown_and_short_words_give_zero_vector() {
        let vocab = vocab_of(&["great product here", "bad service here"]);
        let bow = BagOfWords::new(&vocab);
        let p = Preprocessor::new();

        let v = bow.extract(&p.parse_line("bad job by unknownword\t0"));
        assert_eq!(v.len(), bow.dimension());
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_tiny_vocabulary_short_circuits() {
        let vocab = vocab_of(&["great product"]);
        assert_eq!(vocab.len(), 2);
        let bow = BagOfWords::new(&vocab);
        let v = bow.extract(&Preprocessor::new().parse_line("great product\t1"));
        assert_eq!(v, vec![0.0, 0.0]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let vocab = vocab_of(&["lovely little phone case", "terrible battery life"]);
        let bow = BagOfWords::new(&vocab);
        let rec = Preprocessor::new().parse_line("lovely battery\t1");
        assert_eq!(bow.extract(&rec), bow.extract(&rec));
    }
}
