// ============================================================
// Layer 4 — Example Batcher
// ============================================================
// Stacks a slice of examples into the tensors the linear model
// consumes.
//
//   Input:  N examples, each with D features
//   Output: features [N, D] (f32), labels [N] (int)
//
// Every example must have exactly `dimension` features and, for
// a model with K > 1 outputs, a label below K. A violation is
// reported as an error naming the offending example; nothing is
// padded or truncated.

use anyhow::{bail, Result};
use burn::{prelude::*, tensor::TensorData};

use crate::domain::dataset::Example;

/// A batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct ExampleBatch<B: Backend> {
    /// shape: [batch_size, dimension]
    pub features: Tensor<B, 2>,

    /// shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ExampleBatcher<B: Backend> {
    pub device:    B::Device,
    pub dimension: usize,
    /// Number of classes, or 1 for a binary (logistic) model.
    pub outputs:   usize,
}

impl<B: Backend> ExampleBatcher<B> {
    pub fn new(device: B::Device, dimension: usize, outputs: usize) -> Self {
        Self { device, dimension, outputs }
    }

    /// Largest label a model with `outputs` outputs accepts.
    fn max_label(&self) -> usize {
        if self.outputs <= 1 { 1 } else { self.outputs - 1 }
    }

    /// Check one example against the batcher's shape.
    pub fn validate(&self, features: &[f32], label: usize) -> Result<()> {
        if features.len() != self.dimension {
            bail!(
                "example has {} features, model expects {}",
                features.len(),
                self.dimension
            );
        }
        if label > self.max_label() {
            bail!("label {} is outside 0..={}", label, self.max_label());
        }
        Ok(())
    }

    /// Stack `(features, label)` pairs into one batch.
    pub fn batch<'a, I>(&self, items: I) -> Result<ExampleBatch<B>>
    where
        I: IntoIterator<Item = (&'a [f32], usize)>,
    {
        let mut flat   = Vec::new();
        let mut labels = Vec::new();

        for (features, label) in items {
            self.validate(features, label)?;
            flat.extend_from_slice(features);
            labels.push(label as i64);
        }
        if labels.is_empty() {
            bail!("cannot build an empty batch");
        }

        let rows = labels.len();
        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [rows, self.dimension]),
            &self.device,
        );
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        Ok(ExampleBatch { features, labels })
    }

    /// A batch holding one owned example.
    pub fn single(&self, example: &Example) -> Result<ExampleBatch<B>> {
        self.batch(std::iter::once((example.features.as_slice(), example.label)))
    }
}
