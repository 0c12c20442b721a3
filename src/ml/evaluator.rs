// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a fitted Classifier over a held-out LabeledDataset and
// fills an EvaluationReport.
//
// Two ways to judge a score vector:
//   ArgMax         — predicted class = index of the largest score,
//                    lowest index on ties; correct iff == label
//   Tolerance(eps) — single score; correct iff |score - label| <= eps,
//                    a miss is tallied under round(score) (0 or 1)
//
// A predict() error or an empty score vector is reported through
// ProgressObserver::diagnostic and the example is skipped. It is
// counted as a failure, not in `total`.

use anyhow::{anyhow, Result};
use std::time::Instant;

use crate::domain::dataset::LabeledDataset;
use crate::domain::traits::{Classifier, ProgressObserver};
use crate::infra::metrics::EvaluationReport;

/// Tolerance for single-score binary models.
pub const BINARY_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scoring {
    ArgMax,
    Tolerance(f32),
}

/// Index of the largest score; the first one wins a tie.
/// NaN scores are never selected, so an all-NaN vector gives `None`.
pub fn arg_max(scores: &[f32]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some(b) if s > scores[b] => best = Some(i),
            Some(_) => {}
            None if !s.is_nan() => best = Some(i),
            None => {}
        }
    }
    best
}

impl Scoring {
    /// `(correct, predicted_class)` for one example.
    pub fn judge(&self, scores: &[f32], label: usize) -> Result<(bool, usize)> {
        match *self {
            Scoring::ArgMax => {
                let predicted =
                    arg_max(scores).ok_or_else(|| anyhow!("no finite score to pick from"))?;
                Ok((predicted == label, predicted))
            }
            Scoring::Tolerance(eps) => {
                let score = *scores.first().ok_or_else(|| anyhow!("empty score vector"))?;
                let correct = (score - label as f32).abs() <= eps;
                let predicted = usize::from(score >= 0.5);
                Ok((correct, predicted))
            }
        }
    }
}

/// Score every example of `dataset` with `model`.
pub fn evaluate<C: Classifier + ?Sized>(
    model:    &C,
    dataset:  &LabeledDataset,
    scoring:  Scoring,
    method:   &str,
    progress: &mut dyn ProgressObserver,
) -> EvaluationReport {
    let mut report = EvaluationReport::new(method);
    let started = Instant::now();

    progress.begin("testing", Some(dataset.len()));
    for (index, (features, label)) in dataset.iter().enumerate() {
        let judged = model
            .predict(features)
            .and_then(|scores| scoring.judge(&scores, label));

        match judged {
            Ok((true, _)) => report.record_hit(),
            Ok((false, predicted)) => report.record_miss(predicted),
            Err(e) => {
                progress.diagnostic(&format!("Prediction failed for example {index}: {e:#}"));
                report.record_failure();
            }
        }
        progress.advance(index + 1);
    }
    progress.finish(dataset.len());

    report.elapsed = started.elapsed();
    report
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Silent;
    use anyhow::bail;

    /// Returns the features as the scores; fails on a negative first feature.
    struct Echo;

    impl Classifier for Echo {
        fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
            if features.first().is_some_and(|&f| f < 0.0) {
                bail!("negative input");
            }
            Ok(features.to_vec())
        }
    }

    fn dataset(rows: &[(&[f32], usize)]) -> LabeledDataset {
        let mut ds = LabeledDataset::new();
        for (f, l) in rows {
            ds.push(f.to_vec(), *l);
        }
        ds
    }

    #[test]
    fn test_arg_max_tie_goes_to_lowest_index() {
        assert_eq!(arg_max(&[0.1, 0.7, 0.7, 0.2]), Some(1));
        assert_eq!(arg_max(&[0.5, 0.5]), Some(0));
        assert_eq!(arg_max(&[]), None);
    }

    #[test]
    fn test_arg_max_never_picks_nan() {
        assert_eq!(arg_max(&[0.2, f32::NAN, 0.1]), Some(0));
        assert_eq!(arg_max(&[f32::NAN, 0.3, 0.1]), Some(1));
        assert_eq!(arg_max(&[0.1, 0.4, f32::NAN, 0.3]), Some(1));
        assert_eq!(arg_max(&[f32::NAN, f32::NAN]), None);
    }

    #[test]
    fn test_all_nan_scores_count_as_failures() {
        let ds = dataset(&[(&[f32::NAN, f32::NAN], 0), (&[0.2, 0.8], 1)]);
        let r = evaluate(&Echo, &ds, Scoring::ArgMax, "Softmax", &mut Silent);
        assert_eq!(r.total, 1);
        assert_eq!(r.failures, 1);
    }

    #[test]
    fn test_argmax_evaluation_and_tally() {
        let ds = dataset(&[
            (&[0.9, 0.1, 0.0], 0),
            (&[0.2, 0.3, 0.5], 2),
            (&[0.1, 0.8, 0.1], 0), // predicted 1
            (&[0.4, 0.4, 0.2], 1), // tie → predicted 0
        ]);
        let r = evaluate(&Echo, &ds, Scoring::ArgMax, "Softmax", &mut Silent);
        assert_eq!(r.total, 4);
        assert_eq!(r.wrong, 2);
        assert_eq!(r.tally.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 1)]);
        assert!((r.accuracy() - 50.0).abs() < 1e-9);
    }

    /// Keeps every diagnostic instead of logging it.
    #[derive(Default)]
    struct Diagnostics(Vec<String>);

    impl ProgressObserver for Diagnostics {
        fn begin(&mut self, _stage: &str, _total: Option<usize>) {}
        fn advance(&mut self, _done: usize) {}
        fn finish(&mut self, _done: usize) {}
        fn diagnostic(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    #[test]
    fn test_one_failure_among_n_is_skipped() {
        let ds = dataset(&[
            (&[0.9, 0.1], 0),
            (&[-1.0, 0.0], 0),
            (&[0.1, 0.9], 1),
        ]);
        let mut seen = Diagnostics::default();
        let r = evaluate(&Echo, &ds, Scoring::ArgMax, "Softmax", &mut seen);
        assert_eq!(r.total, 2);
        assert_eq!(r.failures, 1);
        assert_eq!(r.wrong, 0);
        assert_eq!(r.accuracy(), 100.0);

        assert_eq!(seen.0.len(), 1, "{:?}", seen.0);
        assert!(seen.0[0].contains("example 1"));
        assert!(seen.0[0].contains("negative input"));
    }

    #[test]
    fn test_tolerance_scoring() {
        let tol = Scoring::Tolerance(BINARY_TOLERANCE);
        assert_eq!(tol.judge(&[0.995], 1).unwrap(), (true, 1));
        assert_eq!(tol.judge(&[0.005], 0).unwrap(), (true, 0));
        // confident but not within 0.01
        assert_eq!(tol.judge(&[0.98], 1).unwrap(), (false, 1));
        assert_eq!(tol.judge(&[0.7], 0).unwrap(), (false, 1));
        assert!(tol.judge(&[], 0).is_err());
    }

    #[test]
    fn test_empty_scores_count_as_failures() {
        let ds = dataset(&[(&[], 0)]);
        let r = evaluate(&Echo, &ds, Scoring::Tolerance(BINARY_TOLERANCE), "Logistic", &mut Silent);
        assert_eq!(r.total, 0);
        assert_eq!(r.failures, 1);
        assert_eq!(r.accuracy(), 0.0);
    }
}
