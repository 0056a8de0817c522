//! Selecting which tests actually run.
//!
//! The run configuration may carry a regex over test titles. Planning
//! applies it up front, so the run loop and the renderer only ever see the
//! tests that survived; a group whose tests all fall away is dropped whole
//! and leaves no trace in the output or the totals.

use anyhow::Context;
use regex::Regex;

use crate::config::RunConfig;
use crate::suite::{Group, Suite, TestCase};

/// One group with its surviving tests.
#[derive(Debug)]
pub struct GroupPlan<'suite> {
    /// The group as declared.
    pub group: &'suite Group,
    /// The tests that passed the filter, in declaration order.
    pub tests: Vec<&'suite TestCase>,
}

/// The groups a run will execute.
#[derive(Debug)]
pub struct Plan<'suite> {
    /// Groups with at least one surviving test.
    pub groups: Vec<GroupPlan<'suite>>,
}

/// Applies the configured title filter to a suite.
///
/// An invalid pattern is a configuration error and aborts before anything
/// runs.
pub fn build_plan<'suite>(
    suite: &'suite Suite,
    config: &RunConfig,
) -> anyhow::Result<Plan<'suite>> {
    let filter = config
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .with_context(|| {
            format!(
                "invalid test filter {:?}",
                config.filter.as_deref().unwrap_or_default()
            )
        })?;

    let groups = suite
        .groups
        .iter()
        .filter_map(|group| {
            let tests: Vec<&TestCase> = group
                .tests
                .iter()
                .filter(|test| match &filter {
                    Some(filter) => filter.is_match(&test.title),
                    None => true,
                })
                .collect();
            if tests.is_empty() {
                None
            } else {
                Some(GroupPlan { group, tests })
            }
        })
        .collect();

    Ok(Plan { groups })
}
