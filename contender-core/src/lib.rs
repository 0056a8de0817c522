#![warn(missing_docs)]
//! Contender Core - Pipeline Runtime
//!
//! This crate provides the execution machinery for comparative benchmarks:
//! - `Registry` of callable functions and types with named parameters
//! - `Callback` pipelines, resolved against the registry before timing starts
//! - Panic-guarded invocation with per-call output capture
//! - `Outcome` records classified by kind, fed back to later stages as the
//!   reserved `partial` argument
//! - Compact value and throw formatting for expectation diagnostics

mod bind;
mod capture;
mod error;
mod format;
mod invoke;
mod outcome;
mod pipeline;
mod registry;
mod value;

pub use bind::{NamedArgs, Param};
pub use capture::Capture;
pub use error::InvokeError;
pub use format::{Formatter, ThrowField, DEFAULT_LIMIT};
pub use invoke::{resolve, Callback, Invocable};
pub use outcome::{Kind, Outcome, Thrown};
pub use pipeline::{
    resolve_stages, run_iteration, IterationRecord, RESERVED_ITERATION, RESERVED_PARTIAL,
};
pub use registry::{CallResult, Instance, Registry, State, TypeBuilder, DEFAULT_METHOD};
pub use value::Value;
