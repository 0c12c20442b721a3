// ============================================================
// Layer 4 — Dataset Assembler
// ============================================================
// Drives a reader and a feature extractor across every record
// and collects the results, in source order, into a
// LabeledDataset.
//
//   MnistSet ──PixelEncoder──┐
//                            ├──▶ LabeledDataset
//   review files ─BagOfWords─┘
//
// Review lines whose label does not parse, or is neither 0 nor 1,
// are skipped here.

use anyhow::Result;
use std::path::Path;

use crate::data::features::{BagOfWords, PixelEncoder};
use crate::data::preprocessor::Preprocessor;
use crate::data::reviews::ReviewLines;
use crate::domain::dataset::{Example, LabeledDataset};
use crate::domain::traits::{ImageSource, ProgressObserver};

/// Sentiment labels are 0 (negative) or 1 (positive).
pub const MAX_SENTIMENT_LABEL: usize = 1;

/// Extract every image of `source`, in index order.
pub fn assemble_images<S: ImageSource + ?Sized>(
    source:   &S,
    encoder:  &PixelEncoder,
    progress: &mut dyn ProgressObserver,
) -> LabeledDataset {
    let total = source.count();
    let mut dataset = LabeledDataset::with_capacity(total);

    progress.begin("images", Some(total));
    for (done, record) in (0..total).filter_map(|i| source.get(i)).enumerate() {
        dataset.push(encoder.extract(&record), usize::from(record.label));
        progress.advance(done + 1);
    }
    progress.finish(dataset.len());

    dataset
}

/// Extract the image at `index` as an owned example.
pub fn image_example<S: ImageSource + ?Sized>(
    source:  &S,
    encoder: &PixelEncoder,
    index:   usize,
) -> Option<Example> {
    let record = source.get(index)?;
    Some(Example::new(encoder.extract(&record), usize::from(record.label)))
}

/// Extract every labelled line of one review file, in file order.
pub fn assemble_reviews(
    path:         &Path,
    preprocessor: &Preprocessor,
    bag:          &BagOfWords<'_>,
    progress:     &mut dyn ProgressObserver,
) -> Result<LabeledDataset> {
    let mut dataset = LabeledDataset::new();
    let mut skipped = 0usize;

    progress.begin(&format!("munging < {} >", path.display()), None);
    let mut lines = 0usize;
    for line in ReviewLines::open(path)? {
        let record = preprocessor.parse_line(&line?);
        lines += 1;
        progress.advance(lines);

        let Some(label) = record.label.filter(|&l| l <= MAX_SENTIMENT_LABEL) else {
            skipped += 1;
            continue;
        };
        dataset.push(bag.extract(&record), label);
    }
    progress.finish(lines);

    if skipped > 0 {
        tracing::debug!("Skipped {} lines without a 0/1 label in '{}'", skipped, path.display());
    }
    Ok(dataset)
}

/// Assemble several review files back to back, in the given order.
pub fn assemble_review_files<P: AsRef<Path>>(
    paths:        &[P],
    preprocessor: &Preprocessor,
    bag:          &BagOfWords<'_>,
    progress:     &mut dyn ProgressObserver,
) -> Result<LabeledDataset> {
    let mut all = LabeledDataset::new();
    for path in paths {
        let mut part = assemble_reviews(path.as_ref(), preprocessor, bag, progress)?;
        all.append(&mut part);
    }
    Ok(all)
}
