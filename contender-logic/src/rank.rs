//! Display ordering of test summaries.

use std::cmp::Ordering;

use crate::status::Status;
use crate::summary::TestSummary;

/// Sorts summaries for display: successes first, fastest average leading,
/// then partial, failed and skipped entries. Order within the non-success
/// categories is the insertion order, the sort is stable.
pub fn rank(summaries: &mut [TestSummary]) {
    summaries.sort_by(|a, b| match a.status.cmp(&b.status) {
        Ordering::Equal if a.status == Status::Success => a.average.cmp(&b.average),
        other => other,
    });
}
