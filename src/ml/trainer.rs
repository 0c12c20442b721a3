// ============================================================
// Layer 5 — Batch Trainer
// ============================================================
// Fits a LinearModel to an in-memory LabeledDataset with SGD.
//
//   Autodiff<NdArray>  — training backend (gradients)
//   NdArray            — inference backend, via model.valid()
//
// One epoch visits every example once. The method decides how
// many examples share one gradient step:
//
//   batch       — the whole dataset, one step per epoch
//   stochastic  — one example per step
//   mini-batch  — `size` examples per step
//
// For stochastic and mini-batch the visiting order is
// reshuffled every epoch from a seeded StdRng.
//
// L2 regularisation is burn's weight decay on the SGD update:
//   θ = θ - lr * (g + λθ)

use anyhow::{bail, Result};
use burn::{
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::ElementConversion,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::data::batcher::{ExampleBatch, ExampleBatcher};
use crate::domain::dataset::LabeledDataset;
use crate::domain::traits::Trainer;
use crate::ml::inferencer::Inferencer;
use crate::ml::model::{LinearModel, LinearModelConfig, Objective};

pub(crate) type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// How many examples feed one gradient step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizationMethod {
    Batch,
    Stochastic,
    MiniBatch { size: usize },
}

impl OptimizationMethod {
    /// Examples per step for a dataset of `total` examples.
    pub fn batch_size(&self, total: usize) -> usize {
        match *self {
            OptimizationMethod::Batch => total.max(1),
            OptimizationMethod::Stochastic => 1,
            OptimizationMethod::MiniBatch { size } => size.max(1),
        }
    }
}

impl Default for OptimizationMethod {
    fn default() -> Self {
        OptimizationMethod::MiniBatch { size: 32 }
    }
}

/// Solver hyper-parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub method:         OptimizationMethod,
    pub learning_rate:  f64,
    /// L2 penalty λ; 0 disables weight decay
    pub regularization: f32,
    pub epochs:         usize,
    /// Seeds the per-epoch visiting order
    pub seed:           u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method:         OptimizationMethod::default(),
            learning_rate:  0.05,
            regularization: 1e-4,
            epochs:         10,
            seed:           42,
        }
    }
}

impl SolverConfig {
    pub(crate) fn optimizer_config(&self) -> SgdConfig {
        let decay = (self.regularization > 0.0)
            .then(|| WeightDecayConfig::new(self.regularization));
        SgdConfig::new().with_weight_decay(decay)
    }
}

/// One SGD step on `batch`. The update is skipped when the loss
/// is not finite; the caller decides what that means.
pub(crate) fn descend<O>(
    model:         LinearModel<TrainBackend>,
    optim:         &mut O,
    learning_rate: f64,
    batch:         ExampleBatch<TrainBackend>,
    objective:     Objective,
) -> (LinearModel<TrainBackend>, f32)
where
    O: Optimizer<LinearModel<TrainBackend>, TrainBackend>,
{
    let loss = model.forward_loss(batch, objective);
    let value: f32 = loss.clone().into_scalar().elem::<f32>();
    if !value.is_finite() {
        return (model, value);
    }

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    (optim.step(learning_rate, model, grads), value)
}

/// Batch-mode training driver.
#[derive(Debug, Clone)]
pub struct LinearTrainer {
    objective: Objective,
    config:    SolverConfig,
}

impl LinearTrainer {
    pub fn new(objective: Objective, config: SolverConfig) -> Self {
        Self { objective, config }
    }
}

impl Trainer for LinearTrainer {
    type Model = Inferencer;

    fn fit(&self, dataset: &LabeledDataset) -> Result<Inferencer> {
        let total     = dataset.len();
        let dimension = dataset.dimension();
        if dataset.is_empty() {
            bail!("cannot fit a model on an empty dataset");
        }
        if dimension == 0 {
            bail!("cannot fit a model on zero-length feature vectors");
        }

        let device  = Default::default();
        let outputs = self.objective.outputs();

        // ── Build model ───────────────────────────────────────────────────────
        let mut model: LinearModel<TrainBackend> =
            LinearModelConfig::new(dimension, outputs).init(&device);
        let mut optim = self
            .config
            .optimizer_config()
            .init::<TrainBackend, LinearModel<TrainBackend>>();
        let batcher = ExampleBatcher::<TrainBackend>::new(device, dimension, outputs);

        let batch_size = self.config.method.batch_size(total);
        let mut order: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        tracing::info!(
            "Fitting {} model: {} examples, x in R^{}, {} outputs, {} per step",
            self.objective.name(),
            total,
            dimension,
            outputs,
            batch_size,
        );

        // ── Epoch loop ────────────────────────────────────────────────────────
        for epoch in 1..=self.config.epochs {
            let started = Instant::now();
            if batch_size < total {
                order.shuffle(&mut rng);
            }

            let mut loss_sum = 0.0f64;
            let mut steps    = 0usize;

            for chunk in order.chunks(batch_size) {
                let batch = batcher.batch(chunk.iter().filter_map(|&i| dataset.example(i)))?;
                let (next, loss) =
                    descend(model, &mut optim, self.config.learning_rate, batch, self.objective);
                model = next;

                if !loss.is_finite() {
                    bail!(
                        "loss diverged ({}) in epoch {}; try a smaller learning rate",
                        loss,
                        epoch
                    );
                }
                loss_sum += f64::from(loss);
                steps    += 1;
            }

            let avg_loss = if steps > 0 { loss_sum / steps as f64 } else { f64::NAN };
            tracing::info!(
                "Epoch {:>3}/{} | loss={:.4} | {:.2?}",
                epoch,
                self.config.epochs,
                avg_loss,
                started.elapsed(),
            );
        }

        tracing::info!("Training complete!");
        Ok(Inferencer::new(model.valid(), self.objective, dimension))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Classifier;

    /// Class k lights up feature k.
    fn one_hot_classes(classes: usize, copies: usize) -> LabeledDataset {
        let mut ds = LabeledDataset::new();
        for _ in 0..copies {
            for k in 0..classes {
                let mut x = vec![0.0; classes];
                x[k] = 1.0;
                ds.push(x, k);
            }
        }
        ds
    }

    #[test]
    fn test_batch_size_per_method() {
        assert_eq!(OptimizationMethod::Batch.batch_size(250), 250);
        assert_eq!(OptimizationMethod::Batch.batch_size(0), 1);
        assert_eq!(OptimizationMethod::Stochastic.batch_size(250), 1);
        assert_eq!(OptimizationMethod::MiniBatch { size: 16 }.batch_size(250), 16);
        assert_eq!(OptimizationMethod::MiniBatch { size: 0 }.batch_size(250), 1);
    }

    #[test]
    fn test_solver_config_from_partial_json() {
        let cfg: SolverConfig =
            serde_json::from_str(r#"{ "method": { "kind": "batch" }, "epochs": 3 }"#).unwrap();
        assert_eq!(cfg.method, OptimizationMethod::Batch);
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let trainer = LinearTrainer::new(Objective::Logistic, SolverConfig::default());
        assert!(trainer.fit(&LabeledDataset::new()).is_err());
    }

    #[test]
    fn test_softmax_learns_separable_classes() {
        let ds = one_hot_classes(3, 8);
        let cfg = SolverConfig {
            method: OptimizationMethod::MiniBatch { size: 4 },
            learning_rate: 0.5,
            regularization: 0.0,
            epochs: 60,
            seed: 1,
        };
        let model = LinearTrainer::new(Objective::Softmax { classes: 3 }, cfg)
            .fit(&ds)
            .unwrap();

        for k in 0..3 {
            let mut x = vec![0.0; 3];
            x[k] = 1.0;
            let scores = model.predict(&x).unwrap();
            assert_eq!(scores.len(), 3);
            let best = scores
                .iter()
                .enumerate()
                .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best });
            assert_eq!(best, k);
        }
    }

    #[test]
    fn test_logistic_learns_single_feature() {
        let mut ds = LabeledDataset::new();
        for _ in 0..10 {
            ds.push(vec![1.0, 0.0], 1);
            ds.push(vec![0.0, 1.0], 0);
        }
        let cfg = SolverConfig {
            method: OptimizationMethod::Batch,
            learning_rate: 1.0,
            regularization: 0.0,
            epochs: 300,
            seed: 1,
        };
        let model = LinearTrainer::new(Objective::Logistic, cfg).fit(&ds).unwrap();

        let positive = model.predict(&[1.0, 0.0]).unwrap();
        let negative = model.predict(&[0.0, 1.0]).unwrap();
        assert_eq!(positive.len(), 1);
        assert!(positive[0] > 0.9, "got {}", positive[0]);
        assert!(negative[0] < 0.1, "got {}", negative[0]);
    }
}
