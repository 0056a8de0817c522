//! Running a resolved pipeline for one iteration.
//!
//! Stages run in declared order, each receiving two reserved arguments on
//! top of the caller's tables: `iteration`, the 1-based iteration number,
//! and `partial`, the previous stage's outcome as a map. A throw stops the
//! chain; the last outcome produced stands for the whole iteration. Wall
//! time covers the full chain and is recorded even when the chain stops
//! early.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bind::NamedArgs;
use crate::error::InvokeError;
use crate::invoke::{resolve, Callback, Invocable};
use crate::outcome::{Kind, Outcome};
use crate::registry::Registry;
use crate::value::Value;

/// Reserved argument carrying the 1-based iteration number.
pub const RESERVED_ITERATION: &str = "iteration";

/// Reserved argument carrying the previous stage's outcome.
pub const RESERVED_PARTIAL: &str = "partial";

/// One timed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// When the iteration started.
    pub started_at: DateTime<Utc>,
    /// Wall time of the whole chain.
    pub elapsed: Duration,
    /// The final outcome.
    pub outcome: Outcome,
}

/// Resolves every stage up front, so name errors surface before timing.
pub fn resolve_stages(
    registry: &Registry,
    callbacks: &[Callback],
) -> Result<Vec<Invocable>, InvokeError> {
    callbacks.iter().map(|callback| resolve(registry, callback)).collect()
}

/// Runs the chain once.
///
/// An empty chain yields a skipped outcome. Reserved entries shadow any
/// caller-supplied argument of the same name, in the construct table too.
pub fn run_iteration(
    stages: &[Invocable],
    iteration: u64,
    args: &NamedArgs,
    construct_args: &NamedArgs,
) -> Result<IterationRecord, InvokeError> {
    let started_at = Utc::now();
    let timer = Instant::now();

    let mut partial = Outcome::pending();
    if stages.is_empty() {
        partial = Outcome::skipped();
    } else {
        for stage in stages {
            let extended = extend(args, iteration, &partial);
            let extended_construct = extend(construct_args, iteration, &partial);
            partial = stage.call(&extended, &extended_construct)?;
            if partial.kind == Kind::Throw {
                break;
            }
        }
    }

    Ok(IterationRecord {
        started_at,
        elapsed: timer.elapsed(),
        outcome: partial,
    })
}

fn extend(args: &NamedArgs, iteration: u64, partial: &Outcome) -> NamedArgs {
    let mut extended = args.clone();
    extended.insert(RESERVED_ITERATION.to_string(), Value::Int(iteration as i64));
    extended.insert(RESERVED_PARTIAL.to_string(), partial.to_value());
    extended
}
