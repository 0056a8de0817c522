#![warn(missing_docs)]
//! # Contender
//!
//! A correctness-aware comparative benchmark harness: run rival
//! implementations of the same operation under identical inputs, validate
//! every iteration against a declared expectation, and rank the survivors.
//! Speed without correctness never wins: a failing implementation is
//! demoted no matter how fast it ran.
//!
//! - **Pipelines**: each test is an ordered chain of stages; a stage sees
//!   the reserved `iteration` number and the previous stage's `partial`
//!   outcome alongside the group's own named arguments
//! - **Expectations**: return value, emitted output, thrown error and
//!   outcome type checked independently, with one diagnostic per mismatch
//! - **Aggregation**: per-test folds over iteration verdicts, plus a final
//!   cross-group fold of same-titled tests
//! - **Renderers**: console, HTML, or none, always caller-supplied; the
//!   core never sniffs its environment
//!
//! ## Quick start
//!
//! ```
//! use contender::prelude::*;
//!
//! let suite = Suite::new("string joining").group(
//!     Group::new("small inputs").iterations(3).test(
//!         "push_str",
//!         Some(Expectation::new().returns("ab").kind("string")),
//!         [Callback::closure([] as [&str; 0], |_capture, _args| {
//!             let mut joined = String::new();
//!             joined.push_str("a");
//!             joined.push_str("b");
//!             Ok(Value::Str(joined))
//!         })],
//!     ),
//! );
//!
//! let report = suite
//!     .run(&RunConfig::default(), &mut contender::render::Null)
//!     .unwrap();
//! assert_eq!(report.summaries[0].status, Status::Success);
//! ```

mod config;
mod plan;
mod runner;
mod suite;

pub use config::RunConfig;
pub use plan::{build_plan, GroupPlan, Plan};
pub use runner::{run, RunReport};
pub use suite::{Group, Suite, TestCase};

// Re-export the execution environment
pub use contender_core::{
    Callback, Capture, Formatter, Instance, InvokeError, Kind, NamedArgs, Outcome, Param,
    Registry, Thrown, Value,
};

// Re-export the pass/fail logic
pub use contender_logic::{
    Expectation, IterationVerdict, Status, TestSummary, ThrowExpectation, ThrownFields,
};

/// Renderers and the renderer capability trait.
pub mod render {
    pub use contender_report::{Console, Html, Null, Renderer, RendererKind};
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::render::{Renderer, RendererKind};
    pub use crate::{
        Callback, Expectation, Group, Registry, RunConfig, RunReport, Status, Suite, Thrown,
        ThrownFields, Value,
    };
}
