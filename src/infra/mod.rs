// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by both experiments:
//
//   metrics.rs     — EvaluationReport and ConfusionTally, the
//                    accuracy bookkeeping printed at the end
//                    of every run
//
//   progress.rs    — ProgressObserver that logs through tracing
//
//   config_file.rs — JSON config loading for `--config`

/// Accuracy report and per-class error tally
pub mod metrics;

/// tracing-backed progress observer
pub mod progress;

/// JSON config file loader
pub mod config_file;
