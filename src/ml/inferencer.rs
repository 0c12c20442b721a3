// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, bail, Result};
use burn::{prelude::*, tensor::TensorData};

use crate::domain::traits::Classifier;
use crate::ml::model::{LinearModel, Objective};

pub(crate) type InferBackend = burn::backend::NdArray;

/// A trained linear model on the inference backend.
#[derive(Debug)]
pub struct Inferencer {
    model:     LinearModel<InferBackend>,
    objective: Objective,
    dimension: usize,
    device:    <InferBackend as Backend>::Device,
}

impl Inferencer {
    pub fn new(model: LinearModel<InferBackend>, objective: Objective, dimension: usize) -> Self {
        Self { model, objective, dimension, device: Default::default() }
    }
}

impl Classifier for Inferencer {
    /// Softmax: one probability per class. Logistic: `[P(label = 1)]`.
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.dimension {
            bail!(
                "cannot predict on {} features, model was trained on {}",
                features.len(),
                self.dimension
            );
        }

        let input = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(features.to_vec(), [1, self.dimension]),
            &self.device,
        );
        self.model
            .scores(input, self.objective)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("cannot read prediction scores: {e:?}"))
    }
}
