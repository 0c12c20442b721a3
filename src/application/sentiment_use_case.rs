// ============================================================
// Layer 2 — SentimentUseCase
// ============================================================
// Logistic regression on labelled review sentences:
//
//   Step 1: Resolve the review files          (Layer 4 - data)
//   Step 2: Build the vocabulary               (Layer 4 - data)
//   Step 3: Bag-of-words every labelled line   (Layer 4 - data)
//   Step 4: Shuffle with a seeded RNG          (Layer 4 - data)
//   Step 5: Split train / held-out             (Layer 4 - data)
//   Step 6: Fit                                (Layer 5 - ml)
//   Step 7: Score the held-out set             (Layer 5 - ml)
//
// The file order matters: it fixes the vocabulary indices and,
// with the seed, the shuffle. Same files + same seed → same run.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    assembler::assemble_review_files,
    features::BagOfWords,
    preprocessor::Preprocessor,
    reviews::review_paths,
    splitter::{shuffle_paired, split_train_test},
    vocabulary::{build_vocabulary, MIN_TOKEN_LEN},
};
use crate::domain::traits::Trainer;
use crate::infra::{
    metrics::EvaluationReport,
    progress::{timed, LogProgress, TEXT_REPORT_EVERY},
};
use crate::ml::{
    evaluator::{evaluate, Scoring, BINARY_TOLERANCE},
    model::Objective,
    trainer::{LinearTrainer, SolverConfig},
};

pub const DEFAULT_SOURCES: [&str; 3] = [
    "amazon_cells_labelled.txt",
    "yelp_labelled.txt",
    "imdb_labelled.txt",
];

// ─── Sentiment Configuration ─────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub data_dir:       String,
    /// File names under `data_dir`, in processing order
    pub sources:        Vec<String>,
    pub seed:           u64,
    pub train_fraction: f64,
    /// A held-out score counts as correct within this distance of its label
    pub tolerance:      f32,
    pub solver:         SolverConfig,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data/sentiment".to_string(),
            sources:        DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            seed:           42,
            train_fraction: 0.8,
            tolerance:      BINARY_TOLERANCE,
            solver:         SolverConfig {
                learning_rate:  0.1,
                regularization: 0.0,
                ..SolverConfig::default()
            },
        }
    }
}

impl SentimentConfig {
    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("no review files configured");
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            bail!("train fraction must lie strictly between 0 and 1, got {}", self.train_fraction);
        }
        if self.tolerance < 0.0 {
            bail!("tolerance must not be negative, got {}", self.tolerance);
        }
        Ok(())
    }
}

// ─── SentimentUseCase ────────────────────────────────────────────────────────
pub struct SentimentUseCase {
    config: SentimentConfig,
}

impl SentimentUseCase {
    pub fn new(config: SentimentConfig) -> Self {
        Self { config }
    }

    /// Run the whole experiment and return the held-out report.
    pub fn execute(&self) -> Result<EvaluationReport> {
        let cfg = &self.config;
        cfg.validate()?;
        let mut progress = LogProgress::new(TEXT_REPORT_EVERY);
        let preprocessor = Preprocessor::new();

        // ── Step 1: Resolve files ─────────────────────────────────────────────
        let paths = review_paths(&cfg.data_dir, &cfg.sources);

        // ── Step 2: Vocabulary over every line of every file ──────────────────
        let vocab = timed("Building vocabulary", || {
            build_vocabulary(&paths, &preprocessor, MIN_TOKEN_LEN, &mut progress)
        })?;

        // ── Step 3: Sentence vectors ──────────────────────────────────────────
        let bag = BagOfWords::new(&vocab);
        let mut dataset = timed("Munging", || {
            assemble_review_files(paths.as_slice(), &preprocessor, &bag, &mut progress)
        })?;
        tracing::info!("Dataset: {} examples, x in R^{}", dataset.len(), bag.dimension());

        // ── Step 4: Shuffle ───────────────────────────────────────────────────
        timed("Shuffling", || {
            shuffle_paired(&mut dataset, &mut StdRng::seed_from_u64(cfg.seed));
            Ok(())
        })?;

        // ── Step 5: Split ─────────────────────────────────────────────────────
        let (train, test) = split_train_test(dataset, cfg.train_fraction);
        let positives = train.labels().iter().filter(|&&l| l == 1).count();
        tracing::info!(
            "Split: {} train ({} positive), {} held out",
            train.len(),
            positives,
            test.len(),
        );

        // ── Step 6: Fit ───────────────────────────────────────────────────────
        let objective = Objective::Logistic;
        let trainer = LinearTrainer::new(objective, cfg.solver.clone());
        let model = timed("Training", || trainer.fit(&train))?;

        // ── Step 7: Score ─────────────────────────────────────────────────────
        let scoring = Scoring::Tolerance(cfg.tolerance);
        timed("Testing", || {
            Ok(evaluate(&model, &test, scoring, objective.name(), &mut progress))
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_reviews(dir: &Path, name: &str, copies: usize) {
        let mut body = String::new();
        for _ in 0..copies {
            body.push_str("Great product, really wonderful.\t1\n");
            body.push_str("Awful service, totally useless.\t0\n");
        }
        body.push_str("a line without any label\n");
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_default_sources_in_order() {
        let cfg = SentimentConfig::default();
        assert_eq!(
            cfg.sources,
            vec!["amazon_cells_labelled.txt", "yelp_labelled.txt", "imdb_labelled.txt"]
        );
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.train_fraction, 0.8);
    }

    #[test]
    fn test_invalid_fraction_is_rejected() {
        let cfg = SentimentConfig { train_fraction: 1.5, ..SentimentConfig::default() };
        assert!(SentimentUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_reviews(dir.path(), "a.txt", 3);
        let cfg = SentimentConfig {
            data_dir: dir.path().display().to_string(),
            sources:  vec!["a.txt".into(), "missing.txt".into()],
            ..SentimentConfig::default()
        };
        let err = SentimentUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("missing.txt"));
    }

    #[test]
    fn test_end_to_end_split_sizes() {
        let dir = tempfile::tempdir().unwrap();
        write_reviews(dir.path(), "a.txt", 10);
        write_reviews(dir.path(), "b.txt", 15);
        let cfg = SentimentConfig {
            data_dir:  dir.path().display().to_string(),
            sources:   vec!["a.txt".into(), "b.txt".into()],
            // loose enough that a converged model scores everything right
            tolerance: 0.2,
            solver:    SolverConfig {
                learning_rate: 0.5,
                epochs: 40,
                ..SentimentConfig::default().solver
            },
            ..SentimentConfig::default()
        };

        let report = SentimentUseCase::new(cfg).execute().unwrap();
        // 50 labelled lines → 40 train, 10 held out
        assert_eq!(report.total, 10);
        assert_eq!(report.failures, 0);
        assert_eq!(report.method, "Logistic");
        assert!(report.accuracy() > 90.0, "{}", report);
    }
}
