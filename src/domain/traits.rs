// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams of the system. The data and application layers
// only talk to the solver and to the console through these,
// so any solver can be swapped in and the core can be tested
// with stubs.

use anyhow::Result;
use std::sync::mpsc::{Receiver, SyncSender};

use crate::domain::dataset::{Example, LabeledDataset};
use crate::domain::record::ImageRecord;

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// A random-access set of labelled images.
///
/// Implementations:
///   - MnistSet → IDX image/label file pair held in memory
pub trait ImageSource {
    /// Number of images in the set.
    fn count(&self) -> usize;

    /// The image at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<ImageRecord<'_>>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted model.
///
/// `predict` returns one score per output: class probabilities for
/// a multi-class model, a single probability for a binary one.
pub trait Classifier {
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>>;
}

// ─── Trainer ──────────────────────────────────────────────────────────────────
/// Fits a model on a fully materialised dataset.
pub trait Trainer {
    type Model: Classifier;

    fn fit(&self, dataset: &LabeledDataset) -> Result<Self::Model>;
}

// ─── StreamingTrainer ─────────────────────────────────────────────────────────
/// Fits a model from a live feed of examples.
///
/// Consumes `stream` until every sender is dropped. Per-example
/// failures go to `errors` and training carries on; the error
/// channel closes when `learn` returns and drops its sender.
/// A returned `Err` means the learner could not run at all.
pub trait StreamingTrainer {
    type Model: Classifier;

    fn learn(
        &self,
        stream: Receiver<Example>,
        errors: SyncSender<anyhow::Error>,
    ) -> Result<Self::Model>;
}

// ─── ProgressObserver ─────────────────────────────────────────────────────────
/// Side channel for progress output.
///
/// Long-running loops call `begin` once, `advance` after each unit
/// of work with the running count, and `finish` at the end.
/// What gets printed, and how often, is up to the implementation.
///
/// `diagnostic` reports a recoverable per-item problem (the item is
/// skipped, the loop carries on). By default it is a tracing warning.
pub trait ProgressObserver {
    fn begin(&mut self, stage: &str, total: Option<usize>);
    fn advance(&mut self, done: usize);
    fn finish(&mut self, done: usize);

    fn diagnostic(&mut self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Observer that discards progress. Diagnostics still reach tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressObserver for Silent {
    fn begin(&mut self, _stage: &str, _total: Option<usize>) {}
    fn advance(&mut self, _done: usize) {}
    fn finish(&mut self, _done: usize) {}
}
