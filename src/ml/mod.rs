// ============================================================
// Layer 5 — ML / Solver Layer (Burn)
// ============================================================
// The only layer that imports burn's optimisers and backends.
// Everything above it sees the solver through the Trainer,
// StreamingTrainer and Classifier traits.
//
//   model.rs      — LinearModel (θ·x + b) and its two objectives:
//                   softmax / cross-entropy, sigmoid / log-loss
//
//   trainer.rs    — batch SGD over an in-memory dataset
//                   (batch, stochastic or mini-batch steps,
//                   L2 as weight decay)
//
//   online.rs     — streaming SGD fed through bounded queues,
//                   plus the producer/learner/drain wiring
//
//   inferencer.rs — the fitted model on the inference backend
//
//   evaluator.rs  — held-out scoring into an EvaluationReport

/// Linear model and loss functions
pub mod model;

/// Batch gradient-descent trainer
pub mod trainer;

/// Streaming trainer and queue wiring
pub mod online;

/// Fitted model behind the Classifier trait
pub mod inferencer;

/// Arg-max / tolerance scoring over a held-out set
pub mod evaluator;
