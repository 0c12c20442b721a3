// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `digits` and `sentiment`, and
// their flags. Both accept `--config <file.json>`, which
// replaces every other flag with the file's contents.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::{
    digits_use_case::{DigitsConfig, DigitsMode, EVAL_THRESHOLD},
    sentiment_use_case::SentimentConfig,
};
use crate::ml::trainer::{OptimizationMethod, SolverConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Softmax regression on the MNIST digit set
    Digits(DigitsArgs),

    /// Logistic regression on labelled review sentences
    Sentiment(SentimentArgs),
}

// ─── Solver flags (shared) ───────────────────────────────────────────────────
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodArg {
    /// One step per epoch over the whole training set
    Batch,
    /// One step per example
    Stochastic,
    /// One step per --batch-size examples
    MiniBatch,
}

/// Unset flags keep the experiment's own defaults.
#[derive(Args, Debug, Default)]
pub struct SolverArgs {
    /// Gradient descent variant
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Examples per step for mini-batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Step size
    #[arg(long)]
    pub lr: Option<f64>,

    /// L2 regularisation strength (0 disables)
    #[arg(long)]
    pub l2: Option<f32>,

    /// Passes over the training data
    #[arg(long)]
    pub epochs: Option<usize>,
}

impl SolverArgs {
    /// Overlay the given flags on `base`.
    pub fn apply(self, base: SolverConfig) -> SolverConfig {
        let batch_size = self.batch_size.unwrap_or(match base.method {
            OptimizationMethod::MiniBatch { size } => size,
            _ => 32,
        });
        let method = match self.method {
            Some(MethodArg::Batch) => OptimizationMethod::Batch,
            Some(MethodArg::Stochastic) => OptimizationMethod::Stochastic,
            Some(MethodArg::MiniBatch) => OptimizationMethod::MiniBatch { size: batch_size },
            None => match base.method {
                OptimizationMethod::MiniBatch { .. } => {
                    OptimizationMethod::MiniBatch { size: batch_size }
                }
                other => other,
            },
        };

        SolverConfig {
            method,
            learning_rate:  self.lr.unwrap_or(base.learning_rate),
            regularization: self.l2.unwrap_or(base.regularization),
            epochs:         self.epochs.unwrap_or(base.epochs),
            seed:           base.seed,
        }
    }
}

// ─── digits ───────────────────────────────────────────────────────────────────
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Extract the whole training set, then fit
    Batch,
    /// Stream training examples to an online learner
    Online,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingArg {
    /// 1 above the threshold, else 0
    Binarize,
    /// pixel / 255
    Grayscale,
}

#[derive(Args, Debug)]
pub struct DigitsArgs {
    /// JSON config file; overrides every other flag
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory with the four MNIST IDX files (raw or .gz)
    #[arg(long, default_value = "data/mnist")]
    pub data_dir: String,

    #[arg(long, value_enum, default_value_t = ModeArg::Batch)]
    pub mode: ModeArg,

    #[arg(long, value_enum, default_value_t = EncodingArg::Binarize)]
    pub encoding: EncodingArg,

    /// Training threshold (default 167 batch, 200 online)
    #[arg(long)]
    pub train_threshold: Option<u8>,

    /// Test-set threshold
    #[arg(long, default_value_t = EVAL_THRESHOLD)]
    pub eval_threshold: u8,

    #[command(flatten)]
    pub solver: SolverArgs,
}

impl From<DigitsArgs> for DigitsConfig {
    fn from(a: DigitsArgs) -> Self {
        let base = DigitsConfig::default();
        DigitsConfig {
            data_dir:        a.data_dir,
            mode:            match a.mode {
                ModeArg::Batch => DigitsMode::Batch,
                ModeArg::Online => DigitsMode::Online,
            },
            grayscale:       a.encoding == EncodingArg::Grayscale,
            train_threshold: a.train_threshold,
            eval_threshold:  a.eval_threshold,
            solver:          a.solver.apply(base.solver),
        }
    }
}

// ─── sentiment ────────────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct SentimentArgs {
    /// JSON config file; overrides every other flag
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the review files
    #[arg(long, default_value = "data/sentiment")]
    pub data_dir: String,

    /// Comma-separated file names, in processing order
    /// (default: amazon, yelp, imdb)
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Shuffle seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Share of examples used for training
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Max |score - label| for a held-out prediction to count as correct
    #[arg(long, default_value_t = 0.01)]
    pub tolerance: f32,

    #[command(flatten)]
    pub solver: SolverArgs,
}

impl From<SentimentArgs> for SentimentConfig {
    fn from(a: SentimentArgs) -> Self {
        let base = SentimentConfig::default();
        SentimentConfig {
            data_dir:       a.data_dir,
            sources:        if a.sources.is_empty() { base.sources } else { a.sources },
            seed:           a.seed,
            train_fraction: a.train_fraction,
            tolerance:      a.tolerance,
            solver:         a.solver.apply(base.solver),
        }
    }
}
