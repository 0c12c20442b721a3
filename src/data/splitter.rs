// ============================================================
// Layer 4 — Shuffle and Train/Test Splitter
// ============================================================
// Mixes the examples of all sources together and cuts off a
// held-out set.
//
// Shuffle: for i in 0..n, draw j uniformly from [0, i] and swap
// i with j. The swap goes through LabeledDataset::swap, so the
// features and labels follow one permutation and stay paired.
//
// Split: the first floor(fraction * n) examples train, the rest
// are held out.

use rand::Rng;

use crate::domain::dataset::LabeledDataset;

/// Shuffle `dataset` in place with one shared permutation.
pub fn shuffle_paired<R: Rng + ?Sized>(dataset: &mut LabeledDataset, rng: &mut R) {
    for i in 0..dataset.len() {
        let j = rng.gen_range(0..=i);
        dataset.swap(i, j);
    }
}

/// Number of training examples for a dataset of `total`.
pub fn train_len(total: usize, train_fraction: f64) -> usize {
    let n = ((total as f64) * train_fraction).floor() as usize;
    n.min(total)
}

/// Split into (train, test) at `floor(train_fraction * len)`.
pub fn split_train_test(
    dataset:        LabeledDataset,
    train_fraction: f64,
) -> (LabeledDataset, LabeledDataset) {
    let total = dataset.len();
    let at    = train_len(total, train_fraction);
    let (train, test) = dataset.split_at(at);

    tracing::debug!(
        "Dataset split: {} training, {} held out (of {})",
        train.len(),
        test.len(),
        total,
    );

    (train, test)
}
