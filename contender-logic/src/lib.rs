#![warn(missing_docs)]
//! Contender Logic - Verdicts and Aggregation
//!
//! This crate turns raw iteration records into judged, ranked results:
//! - `Expectation` descriptors with per-dimension checks and diagnostics
//! - `IterationVerdict` and the per-test `TestSummary` fold
//! - Cross-group merging of tests sharing a title
//! - The display ranking used by renderers

mod expectation;
mod rank;
mod status;
mod summary;

pub use expectation::{check, Expectation, ThrowExpectation, ThrownFields, SKIPPED_MESSAGE};
pub use rank::rank;
pub use status::Status;
pub use summary::{judge, merge_by_title, summarize, Best, IterationVerdict, TestSummary};
