// ============================================================
// Layer 5 — Linear Model
// ============================================================
// A single dense layer, x in R^D → R^K, shared by both
// experiments. The Objective decides how the K outputs are read:
//
//   Softmax  — K = classes, cross-entropy on the logits
//   Logistic — K = 1, binary cross-entropy on the logit
//
// Losses are computed from logits so large activations stay finite.

use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};
use crate::data::batcher::ExampleBatch;

/// What the linear layer's outputs mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// K logits, softmax probabilities, cross-entropy loss
    Softmax { classes: usize },
    /// one logit, sigmoid probability, binary cross-entropy loss
    Logistic,
}

impl Objective {
    pub fn outputs(&self) -> usize {
        match *self {
            Objective::Softmax { classes } => classes,
            Objective::Logistic => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Objective::Softmax { .. } => "Softmax",
            Objective::Logistic => "Logistic",
        }
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct LinearModelConfig {
    pub num_features: usize,
    pub num_outputs:  usize,
}

impl LinearModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LinearModel<B> {
        LinearModel {
            linear: LinearConfig::new(self.num_features, self.num_outputs).init(device),
        }
    }
}

/// θ·x + b, one row of θ per output.
#[derive(Module, Debug)]
pub struct LinearModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LinearModel<B> {
    /// features: [batch, num_features] → logits: [batch, num_outputs]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Logits → per-output scores (probabilities).
    pub fn scores(&self, features: Tensor<B, 2>, objective: Objective) -> Tensor<B, 2> {
        let logits = self.forward(features);
        match objective {
            Objective::Softmax { .. } => activation::softmax(logits, 1),
            Objective::Logistic => activation::sigmoid(logits),
        }
    }

    /// Mean loss over the batch.
    pub fn forward_loss(&self, batch: ExampleBatch<B>, objective: Objective) -> Tensor<B, 1> {
        let logits = self.forward(batch.features);
        match objective {
            Objective::Softmax { .. } => CrossEntropyLossConfig::new()
                .init(&logits.device())
                .forward(logits, batch.labels),
            Objective::Logistic => {
                let [rows, _] = logits.dims();
                let targets = batch.labels.float().reshape([rows, 1]);
                binary_cross_entropy_with_logits(logits, targets)
            }
        }
    }
}

/// mean( max(z, 0) - z·y + ln(1 + e^-|z|) ), stable for large |z|.
fn binary_cross_entropy_with_logits<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let softplus_tail = logits.clone().abs().neg().exp().add_scalar(1.0).log();
    let loss = logits.clone().clamp_min(0.0) - logits * targets + softplus_tail;
    loss.mean()
}
