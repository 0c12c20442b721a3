// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Accuracy bookkeeping for one evaluation run.
//
//   total     — examples that produced a prediction
//   wrong     — of those, how many missed
//   failures  — examples skipped because predict() errored
//   tally     — predicted class → number of misses for that class
//
// accuracy = 100 * (1 - wrong / total), 0 when nothing was scored.
//
// Example report:
//   ── Softmax evaluation ──────────────────────
//   accuracy      : 91.72%
//   evaluated     : 10000 (828 wrong, 0 failed)
//   wrong by predicted class:
//     0 → 31
//     ...
//   evaluation time: 1.41s (avg 141µs per prediction)

use std::{collections::BTreeMap, fmt, time::Duration};

/// Wrong predictions per predicted class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionTally {
    misses: BTreeMap<usize, u32>,
}

impl ConfusionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one miss whose prediction was `predicted`.
    pub fn record_miss(&mut self, predicted: usize) {
        *self.misses.entry(predicted).or_insert(0) += 1;
    }

    /// Classes with at least one miss, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.misses.iter().map(|(&class, &count)| (class, count))
    }

    pub fn is_empty(&self) -> bool {
        self.misses.is_empty()
    }
}

/// Outcome of running a model over a held-out set.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Shown in the report heading, e.g. "Softmax"
    pub method:   String,
    pub total:    usize,
    pub wrong:    usize,
    pub failures: usize,
    pub tally:    ConfusionTally,
    /// Wall time of the whole evaluation loop
    pub elapsed:  Duration,
}

impl EvaluationReport {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method:   method.into(),
            total:    0,
            wrong:    0,
            failures: 0,
            tally:    ConfusionTally::new(),
            elapsed:  Duration::ZERO,
        }
    }

    pub fn record_hit(&mut self) {
        self.total += 1;
    }

    pub fn record_miss(&mut self, predicted: usize) {
        self.total += 1;
        self.wrong += 1;
        self.tally.record_miss(predicted);
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Percentage in [0, 100].
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.wrong as f64 / self.total as f64)
    }

    /// Mean time per attempted prediction, failures included.
    pub fn avg_prediction_time(&self) -> Duration {
        let attempts = self.total + self.failures;
        if attempts == 0 {
            return Duration::ZERO;
        }
        self.elapsed / attempts as u32
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} evaluation ──────────────────────", self.method)?;
        writeln!(f, "accuracy      : {:.2}%", self.accuracy())?;
        writeln!(
            f,
            "evaluated     : {} ({} wrong, {} failed)",
            self.total, self.wrong, self.failures
        )?;
        if !self.tally.is_empty() {
            writeln!(f, "wrong by predicted class:")?;
            for (class, count) in self.tally.iter() {
                writeln!(f, "  {class} → {count}")?;
            }
        }
        write!(
            f,
            "evaluation time: {:.2?} (avg {:.2?} per prediction)",
            self.elapsed,
            self.avg_prediction_time()
        )
    }
}
