// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the core concepts
// of an experiment: raw records, labelled datasets, and the
// seams to the solver and to progress reporting.
//
// Rules for this layer:
//   - NO burn framework types
//   - NO file I/O
//   - Only plain structs, enums, and traits

// Raw labelled records as read from disk
pub mod record;

// Index-aligned feature/label collections
pub mod dataset;

// Core abstractions (traits) that other layers implement
pub mod traits;
