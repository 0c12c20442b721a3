// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per experiment. Each wires the data, ml and
// infra layers together in order and hands back an
// EvaluationReport; printing is left to Layer 1.

/// Softmax regression on MNIST digits (batch or online)
pub mod digits_use_case;

/// Logistic regression on labelled review sentences
pub mod sentiment_use_case;
