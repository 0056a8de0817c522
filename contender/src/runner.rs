//! The orchestrating run loop.
//!
//! Runs every planned group sequentially, narrating through the renderer:
//! suite title, one subtitle and ranked table per group, then the cross-run
//! "End result" fold and the closing line. Resolution and binding failures
//! abort the whole run; everything a stage itself does wrong has already
//! been captured into its outcome by the executor.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use contender_core::{resolve_stages, run_iteration};
use contender_logic::{judge, merge_by_title, rank, summarize, IterationVerdict, TestSummary};
use contender_report::Renderer;

use crate::config::RunConfig;
use crate::plan::build_plan;
use crate::suite::Suite;

/// What a finished run produced, renderer aside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The cross-run summaries, ranked for display.
    pub summaries: Vec<TestSummary>,
    /// Wall time of the whole run.
    pub elapsed: std::time::Duration,
    /// Number of groups executed.
    pub groups: u64,
    /// Total iterations executed, ignored groups included.
    pub iterations: u64,
}

/// Executes a suite under the given configuration.
///
/// Iterations run strictly one after another; nothing here is concurrent,
/// since interleaving would corrupt the comparative wall-clock timings. The
/// cross-run fold concatenates the raw verdicts of same-titled tests from
/// every non-ignored group and re-folds them, so the returned summaries
/// reflect every iteration a title ran.
pub fn run(
    suite: &Suite,
    config: &RunConfig,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<RunReport> {
    let started = Instant::now();
    let formatter = config.formatter();
    let plan = build_plan(suite, config)?;

    renderer.start();
    renderer.title(&suite.title, suite.comment.as_deref());
    renderer.skipline(1);

    let mut folded_groups: Vec<Vec<TestSummary>> = Vec::new();
    let mut total_iterations: u64 = 0;
    let group_count = plan.groups.len() as u64;

    for planned in &plan.groups {
        let group = planned.group;
        let iterations = config.effective_iterations(group);
        debug!(group = %group.title, iterations, tests = planned.tests.len(), "group start");

        renderer.subtitle(&group.title, group.comment.as_deref(), Some(iterations));

        let total = iterations * planned.tests.len() as u64;
        let mut cursor: u64 = 1;
        let mut summaries = Vec::with_capacity(planned.tests.len());

        for test in &planned.tests {
            let stages = resolve_stages(&suite.registry, &test.pipeline)?;

            let mut verdicts: Vec<IterationVerdict> = Vec::with_capacity(iterations as usize);
            for iteration in 1..=iterations {
                renderer.progress_write(&format!(
                    "→ [Running test {cursor}/{total}] {} {iteration}/{iterations}",
                    test.title
                ));
                cursor += 1;

                let record =
                    run_iteration(&stages, iteration, &group.args, &group.construct_args)?;
                verdicts.push(judge(record, test.expectation.as_ref(), &formatter));
            }
            total_iterations += iterations;

            // Ignored groups still run every iteration, they just never
            // fold into a summary.
            if !group.ignore_results {
                let summary = summarize(test.title.clone(), verdicts);
                debug!(test = %summary.title, status = ?summary.status, "test folded");
                summaries.push(summary);
            }
        }
        renderer.progress_clear();

        if group.ignore_results {
            renderer.ignored();
        } else {
            rank(&mut summaries);
            renderer.results(&summaries, false);
            folded_groups.push(summaries);
        }
        renderer.skipline(1);
    }

    let mut finals = merge_by_title(&folded_groups);
    rank(&mut finals);

    if !config.ignore_final {
        renderer.subtitle(
            "End result",
            Some("Final average considering all benchmarks previously run"),
            None,
        );
        renderer.results(&finals, true);
        renderer.skipline(1);
    }

    let elapsed = started.elapsed();
    renderer.end(elapsed, group_count, total_iterations);

    Ok(RunReport {
        summaries: finals,
        elapsed,
        groups: group_count,
        iterations: total_iterations,
    })
}
