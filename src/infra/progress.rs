// ============================================================
// Layer 6 — Progress Logging
// ============================================================
// ProgressObserver that reports through `tracing`.
//
//   INFO  munging < data/yelp_labelled.txt > ...
//   INFO  munging < data/yelp_labelled.txt >: 500 (0.01s)
//   INFO  munging < data/yelp_labelled.txt > done: 1000 in 0.02s

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::domain::traits::ProgressObserver;

/// Lines between reports when scanning review files.
pub const TEXT_REPORT_EVERY: usize = 500;

/// Images between reports when assembling digits.
pub const IMAGE_REPORT_EVERY: usize = 5000;

#[derive(Debug)]
pub struct LogProgress {
    every:   usize,
    stage:   String,
    total:   Option<usize>,
    started: Instant,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every:   every.max(1),
            stage:   String::new(),
            total:   None,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl ProgressObserver for LogProgress {
    fn begin(&mut self, stage: &str, total: Option<usize>) {
        self.stage   = stage.to_string();
        self.total   = total;
        self.started = Instant::now();
        match total {
            Some(n) => tracing::info!("{} ({} items) ...", self.stage, n),
            None => tracing::info!("{} ...", self.stage),
        }
    }

    fn advance(&mut self, done: usize) {
        if done % self.every != 0 {
            return;
        }
        match self.total {
            Some(n) => tracing::info!("{}: {}/{} ({:.2?})", self.stage, done, n, self.elapsed()),
            None => tracing::info!("{}: {} ({:.2?})", self.stage, done, self.elapsed()),
        }
    }

    fn finish(&mut self, done: usize) {
        tracing::info!("{} done: {} in {:.2?}", self.stage, done, self.elapsed());
    }
}

/// Run one pipeline stage and log how long it took.
pub fn timed<T>(stage: &str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let started = Instant::now();
    let out = run()?;
    tracing::info!("{} took {:.2?}", stage, started.elapsed());
    Ok(out)
}
