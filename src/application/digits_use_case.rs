// ============================================================
// Layer 2 — DigitsUseCase
// ============================================================
// Softmax regression on MNIST:
//
//   Step 1: Load IDX image/label files   (Layer 4 - data)
//   Step 2: Train, either
//             batch  — extract all images, then fit
//             online — stream extracted images to the learner
//   Step 3: Extract the test images      (Layer 4 - data)
//   Step 4: Score the test set           (Layer 5 - ml)
//
// Training and testing binarise at different thresholds unless
// grayscale is selected, which applies to both.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    assembler::{assemble_images, image_example},
    features::{PixelEncoder, PixelEncoding},
    mnist::{load_mnist, NUM_DIGITS},
};
use crate::domain::traits::{ImageSource, Trainer};
use crate::infra::{
    metrics::EvaluationReport,
    progress::{timed, LogProgress, IMAGE_REPORT_EVERY},
};
use crate::ml::{
    evaluator::{evaluate, Scoring},
    model::Objective,
    online::{push_all, stream_train, OnlineLearner},
    trainer::{LinearTrainer, SolverConfig},
};

/// Binarisation threshold for batch training.
pub const BATCH_TRAIN_THRESHOLD: u8 = 167;
/// Binarisation threshold for online training.
pub const ONLINE_TRAIN_THRESHOLD: u8 = 200;
/// Binarisation threshold for the test set.
pub const EVAL_THRESHOLD: u8 = 220;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitsMode {
    #[default]
    Batch,
    Online,
}

// ─── Digits Configuration ────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitsConfig {
    /// Directory holding the four IDX files (raw or .gz)
    pub data_dir:        String,
    pub mode:            DigitsMode,
    /// Scale pixels by 1/255 instead of binarising
    pub grayscale:       bool,
    /// None → BATCH_TRAIN_THRESHOLD or ONLINE_TRAIN_THRESHOLD by mode
    pub train_threshold: Option<u8>,
    pub eval_threshold:  u8,
    pub solver:          SolverConfig,
}

impl Default for DigitsConfig {
    fn default() -> Self {
        Self {
            data_dir:        "data/mnist".to_string(),
            mode:            DigitsMode::Batch,
            grayscale:       false,
            train_threshold: None,
            eval_threshold:  EVAL_THRESHOLD,
            solver:          SolverConfig::default(),
        }
    }
}

impl DigitsConfig {
    pub fn train_encoding(&self) -> PixelEncoding {
        if self.grayscale {
            return PixelEncoding::Grayscale;
        }
        let default = match self.mode {
            DigitsMode::Batch => BATCH_TRAIN_THRESHOLD,
            DigitsMode::Online => ONLINE_TRAIN_THRESHOLD,
        };
        PixelEncoding::Binarize { threshold: self.train_threshold.unwrap_or(default) }
    }

    pub fn eval_encoding(&self) -> PixelEncoding {
        if self.grayscale {
            PixelEncoding::Grayscale
        } else {
            PixelEncoding::Binarize { threshold: self.eval_threshold }
        }
    }
}

// ─── DigitsUseCase ───────────────────────────────────────────────────────────
pub struct DigitsUseCase {
    config: DigitsConfig,
}

impl DigitsUseCase {
    pub fn new(config: DigitsConfig) -> Self {
        Self { config }
    }

    /// Run the whole experiment and return the test-set report.
    pub fn execute(&self) -> Result<EvaluationReport> {
        let cfg       = &self.config;
        let objective = Objective::Softmax { classes: NUM_DIGITS };
        let mut progress = LogProgress::new(IMAGE_REPORT_EVERY);

        // ── Step 1: Load IDX files ────────────────────────────────────────────
        let (train_set, test_set) = timed("Loading", || load_mnist(Path::new(&cfg.data_dir)))?;
        let (rows, cols) = train_set.dimensions();
        tracing::info!(
            "Loaded {} training and {} test images of {}x{}",
            train_set.count(),
            test_set.count(),
            rows,
            cols,
        );

        // ── Step 2: Train ─────────────────────────────────────────────────────
        let train_encoder = PixelEncoder::new(cfg.train_encoding());
        tracing::info!("Training pixels: {:?}", train_encoder.encoding());

        let model = match cfg.mode {
            DigitsMode::Batch => {
                let train = timed("Munging", || {
                    Ok(assemble_images(&train_set, &train_encoder, &mut progress))
                })?;
                tracing::info!("Training set: {} examples, x in R^{}", train.len(), train.dimension());

                let trainer = LinearTrainer::new(objective, cfg.solver.clone());
                timed("Training", || trainer.fit(&train))?
            }
            DigitsMode::Online => {
                let learner = OnlineLearner::new(
                    objective,
                    cfg.solver.clone(),
                    train_set.pixels_per_image(),
                );
                let passes = cfg.solver.epochs.max(1);

                let (model, summary) = timed("Training", || {
                    stream_train(&learner, |queue| {
                        let mut pushed = 0;
                        for _ in 0..passes {
                            let examples = (0..train_set.count())
                                .filter_map(|i| image_example(&train_set, &train_encoder, i));
                            pushed += push_all(queue, examples);
                        }
                        pushed
                    })
                })?;
                tracing::info!(
                    "Streamed {} examples in {} passes, {} training errors",
                    summary.pushed,
                    passes,
                    summary.failures,
                );
                model
            }
        };

        // ── Step 3: Extract test images ───────────────────────────────────────
        let eval_encoder = PixelEncoder::new(cfg.eval_encoding());
        let test = assemble_images(&test_set, &eval_encoder, &mut progress);
        tracing::info!("Test set: {} examples, x in R^{}", test.len(), test.dimension());

        // ── Step 4: Score ─────────────────────────────────────────────────────
        let report = timed("Testing", || {
            Ok(evaluate(&model, &test, Scoring::ArgMax, objective.name(), &mut progress))
        })?;
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_follow_mode() {
        let batch = DigitsConfig::default();
        assert_eq!(batch.train_encoding(), PixelEncoding::Binarize { threshold: 167 });
        assert_eq!(batch.eval_encoding(), PixelEncoding::Binarize { threshold: 220 });

        let online = DigitsConfig { mode: DigitsMode::Online, ..DigitsConfig::default() };
        assert_eq!(online.train_encoding(), PixelEncoding::Binarize { threshold: 200 });

        let fixed = DigitsConfig { train_threshold: Some(90), ..online };
        assert_eq!(fixed.train_encoding(), PixelEncoding::Binarize { threshold: 90 });
    }

    #[test]
    fn test_grayscale_applies_to_both_sets() {
        let cfg = DigitsConfig { grayscale: true, ..DigitsConfig::default() };
        assert_eq!(cfg.train_encoding(), PixelEncoding::Grayscale);
        assert_eq!(cfg.eval_encoding(), PixelEncoding::Grayscale);
    }

    #[test]
    fn test_config_from_json() {
        let cfg: DigitsConfig =
            serde_json::from_str(r#"{ "mode": "online", "solver": { "epochs": 2 } }"#).unwrap();
        assert_eq!(cfg.mode, DigitsMode::Online);
        assert_eq!(cfg.solver.epochs, 2);
        assert_eq!(cfg.eval_threshold, EVAL_THRESHOLD);
        assert_eq!(cfg.data_dir, "data/mnist");
    }

    /// Four 2x2 "digits": class k lights pixel k.
    fn write_tiny_mnist(dir: &Path) {
        fn idx(magic: u32, dims: &[u32], body: &[u8]) -> Vec<u8> {
            let mut out = magic.to_be_bytes().to_vec();
            for d in dims {
                out.extend_from_slice(&d.to_be_bytes());
            }
            out.extend_from_slice(body);
            out
        }

        let labels: Vec<u8> = (0..40).map(|i| (i % 4) as u8).collect();
        let pixels: Vec<u8> = labels
            .iter()
            .flat_map(|&l| (0..4u8).map(move |p| if p == l { 250 } else { 10 }))
            .collect();
        let n = labels.len() as u32;

        for prefix in ["train", "t10k"] {
            std::fs::write(
                dir.join(format!("{prefix}-images-idx3-ubyte")),
                idx(2051, &[n, 2, 2], &pixels),
            )
            .unwrap();
            std::fs::write(
                dir.join(format!("{prefix}-labels-idx1-ubyte")),
                idx(2049, &[n], &labels),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_end_to_end_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_mnist(dir.path());

        for mode in [DigitsMode::Batch, DigitsMode::Online] {
            let cfg = DigitsConfig {
                data_dir: dir.path().display().to_string(),
                mode,
                solver: SolverConfig {
                    method: crate::ml::trainer::OptimizationMethod::MiniBatch { size: 4 },
                    learning_rate: 0.5,
                    regularization: 0.0,
                    epochs: 25,
                    seed: 3,
                },
                ..DigitsConfig::default()
            };
            let report = DigitsUseCase::new(cfg).execute().unwrap();
            assert_eq!(report.total, 40);
            assert_eq!(report.failures, 0);
            assert!(report.accuracy() > 90.0, "{mode:?}: {}", report);
        }
    }

    #[test]
    fn test_missing_data_dir_fails() {
        let cfg = DigitsConfig { data_dir: "/no/such/mnist".into(), ..DigitsConfig::default() };
        assert!(DigitsUseCase::new(cfg).execute().is_err());
    }
}
