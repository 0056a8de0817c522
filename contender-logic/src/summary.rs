//! Folding iteration verdicts into per-test summaries.
//!
//! Each iteration is judged on its own, then a test's verdicts fold into a
//! [`TestSummary`]. The fold is order-independent for status and average,
//! while `best` keeps the position of the first fastest success. Tests that
//! ran in several groups under the same title can be re-folded across all
//! their verdicts with [`merge_by_title`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use contender_core::{Formatter, IterationRecord, Outcome};

use crate::expectation::{check, Expectation};
use crate::status::Status;

/// One iteration, judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationVerdict {
    /// When the iteration started.
    pub started_at: DateTime<Utc>,
    /// Wall time of the pipeline chain.
    pub elapsed: Duration,
    /// Verdict for this iteration alone.
    pub status: Status,
    /// One diagnostic per failing dimension.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
    /// The outcome the verdict was based on.
    pub outcome: Outcome,
}

/// Judges one finished iteration against the test's expectation.
pub fn judge(
    record: IterationRecord,
    expectation: Option<&Expectation>,
    formatter: &Formatter,
) -> IterationVerdict {
    let (status, errors) = check(&record.outcome, expectation, formatter);
    IterationVerdict {
        started_at: record.started_at,
        elapsed: record.elapsed,
        status,
        errors,
        outcome: record.outcome,
    }
}

/// The fastest successful iteration of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Best {
    /// Its wall time.
    pub elapsed: Duration,
    /// Its position in the verdict list, 0-based.
    pub index: usize,
}

/// A test's verdicts folded into one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    /// Test title.
    pub title: String,
    /// Folded status.
    pub status: Status,
    /// Fastest success, present for `Success` and `Partial`.
    pub best: Option<Best>,
    /// Mean wall time across successful iterations.
    pub average: Option<Duration>,
    /// Representative diagnostic, see [`summarize`].
    pub error: Option<String>,
    /// The verdicts the fold was computed from.
    pub iterations: Vec<IterationVerdict>,
}

/// Folds a test's verdicts.
///
/// Status: skipped if any iteration skipped, else success if all succeeded,
/// else partial if at least one did, else failed. Timing covers successful
/// iterations only. The representative error is the first diagnostic of the
/// first failed iteration, or of the first skipped one when the whole test
/// was skipped.
pub fn summarize(title: impl Into<String>, verdicts: Vec<IterationVerdict>) -> TestSummary {
    let status = fold_status(&verdicts);
    let (best, average) = if status.has_timing() {
        timing(&verdicts)
    } else {
        (None, None)
    };
    let error = fold_error(status, &verdicts);
    TestSummary {
        title: title.into(),
        status,
        best,
        average,
        error,
        iterations: verdicts,
    }
}

/// Re-folds summaries that share a title across groups.
///
/// Titles keep their first-appearance order. Each merged entry is rebuilt
/// from the concatenated verdicts, so its status and timing reflect every
/// group the title ran in.
pub fn merge_by_title(groups: &[Vec<TestSummary>]) -> Vec<TestSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut gathered: FxHashMap<String, Vec<IterationVerdict>> = FxHashMap::default();
    for summaries in groups {
        for summary in summaries {
            if !gathered.contains_key(&summary.title) {
                order.push(summary.title.clone());
            }
            gathered
                .entry(summary.title.clone())
                .or_default()
                .extend(summary.iterations.iter().cloned());
        }
    }
    order
        .into_iter()
        .map(|title| {
            let verdicts = gathered.remove(&title).unwrap_or_default();
            summarize(title, verdicts)
        })
        .collect()
}

fn fold_status(verdicts: &[IterationVerdict]) -> Status {
    if verdicts.iter().any(|verdict| verdict.status == Status::Skipped) {
        return Status::Skipped;
    }
    if verdicts.iter().all(|verdict| verdict.status == Status::Success) {
        return Status::Success;
    }
    if verdicts.iter().any(|verdict| verdict.status == Status::Success) {
        Status::Partial
    } else {
        Status::Failed
    }
}

fn timing(verdicts: &[IterationVerdict]) -> (Option<Best>, Option<Duration>) {
    let mut best: Option<Best> = None;
    let mut total = Duration::ZERO;
    let mut count: u32 = 0;
    for (index, verdict) in verdicts.iter().enumerate() {
        if verdict.status != Status::Success {
            continue;
        }
        total += verdict.elapsed;
        count += 1;
        let improved = match &best {
            Some(current) => verdict.elapsed < current.elapsed,
            None => true,
        };
        if improved {
            best = Some(Best { elapsed: verdict.elapsed, index });
        }
    }
    if count == 0 {
        return (None, None);
    }
    (best, Some(total / count))
}

fn fold_error(status: Status, verdicts: &[IterationVerdict]) -> Option<String> {
    let wanted = match status {
        Status::Failed | Status::Partial => Status::Failed,
        Status::Skipped => Status::Skipped,
        Status::Success => return None,
    };
    verdicts
        .iter()
        .find(|verdict| verdict.status == wanted)
        .and_then(|verdict| verdict.errors.first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contender_core::{Kind, Value};

    fn verdict(status: Status, micros: u64, errors: &[&str]) -> IterationVerdict {
        IterationVerdict {
            started_at: Utc::now(),
            elapsed: Duration::from_micros(micros),
            status,
            errors: errors.iter().map(|error| (*error).to_string()).collect(),
            outcome: Outcome::from_call(Ok(Value::Null), None),
        }
    }

    #[test]
    fn judge_carries_timing_through() {
        let record = IterationRecord {
            started_at: Utc::now(),
            elapsed: Duration::from_micros(42),
            outcome: Outcome::from_call(Ok(Value::from("TEST")), None),
        };
        let expectation = Expectation::new().returns("TEST");
        let judged = judge(record, Some(&expectation), &Formatter::default());
        assert_eq!(judged.status, Status::Success);
        assert_eq!(judged.elapsed, Duration::from_micros(42));
        assert_eq!(judged.outcome.kind, Kind::String);
        assert!(judged.errors.is_empty());
    }

    #[test]
    fn any_skipped_iteration_skips_the_test() {
        let summary = summarize(
            "a",
            vec![
                verdict(Status::Success, 10, &[]),
                verdict(Status::Skipped, 0, &["Skipped, empty callbacks..."]),
            ],
        );
        assert_eq!(summary.status, Status::Skipped);
        assert!(summary.best.is_none());
        assert!(summary.average.is_none());
        assert_eq!(summary.error.as_deref(), Some("Skipped, empty callbacks..."));
    }

    #[test]
    fn mixed_verdicts_fold_to_partial_with_first_failure() {
        let summary = summarize(
            "b",
            vec![
                verdict(Status::Success, 10, &[]),
                verdict(Status::Failed, 30, &["Expect return \"TEST\", actual 111"]),
                verdict(Status::Failed, 30, &["later failure"]),
            ],
        );
        assert_eq!(summary.status, Status::Partial);
        assert_eq!(summary.error.as_deref(), Some("Expect return \"TEST\", actual 111"));
        // Timing only counts the successful iteration.
        assert_eq!(summary.average, Some(Duration::from_micros(10)));
        assert_eq!(summary.best.map(|best| best.index), Some(0));
    }

    #[test]
    fn all_failed_folds_to_failed_without_timing() {
        let summary = summarize(
            "c",
            vec![
                verdict(Status::Failed, 10, &["first"]),
                verdict(Status::Failed, 20, &["second"]),
            ],
        );
        assert_eq!(summary.status, Status::Failed);
        assert!(summary.average.is_none());
        assert_eq!(summary.error.as_deref(), Some("first"));
    }

    #[test]
    fn best_keeps_the_first_minimum() {
        let summary = summarize(
            "d",
            vec![
                verdict(Status::Success, 20, &[]),
                verdict(Status::Success, 10, &[]),
                verdict(Status::Success, 10, &[]),
                verdict(Status::Success, 40, &[]),
            ],
        );
        assert_eq!(summary.status, Status::Success);
        let best = summary.best.unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.elapsed, Duration::from_micros(10));
        assert_eq!(summary.average, Some(Duration::from_micros(20)));
        assert!(summary.error.is_none());
    }

    #[test]
    fn merge_concatenates_verdicts_per_title() {
        let first = vec![
            summarize("alpha", vec![verdict(Status::Success, 10, &[])]),
            summarize("beta", vec![verdict(Status::Success, 30, &[])]),
        ];
        let second = vec![summarize(
            "alpha",
            vec![verdict(Status::Failed, 20, &["Expect return \"TEST\", actual 111"])],
        )];

        let merged = merge_by_title(&[first, second]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "alpha");
        assert_eq!(merged[0].status, Status::Partial);
        assert_eq!(merged[0].iterations.len(), 2);
        assert_eq!(
            merged[0].error.as_deref(),
            Some("Expect return \"TEST\", actual 111")
        );
        assert_eq!(merged[1].title, "beta");
        assert_eq!(merged[1].status, Status::Success);
    }
}
