// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw files on disk to LabeledDataset values.
//
// Digits:
//   IDX files ─▶ MnistSet ─▶ PixelEncoder ─▶ LabeledDataset
//
// Sentiment:
//   review files ─▶ ReviewLines ─▶ Preprocessor ─▶ VocabularyBuilder
//                                              └─▶ BagOfWords ─▶ LabeledDataset
//                                                   ─▶ shuffle ─▶ 80/20 split
//
// Each module does exactly one step.

/// MNIST IDX image/label loader
pub mod mnist;

/// Line cursor over tab-separated review files
pub mod reviews;

/// Sanitises and tokenises review lines
pub mod preprocessor;

/// Token-to-index dictionary for bag-of-words vectors
pub mod vocabulary;

/// Pixel and bag-of-words feature extractors
pub mod features;

/// Runs extractors across whole sources
pub mod assembler;

/// Paired shuffle and train/test split
pub mod splitter;

/// Stacks examples into burn tensors
pub mod batcher;
