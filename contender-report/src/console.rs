//! Timestamped terminal output.
//!
//! Every line carries a local-time stamp. The per-iteration progress line
//! runs through an `indicatif` spinner so it overwrites itself instead of
//! scrolling the table away.

use std::fmt;
use std::time::Duration;

use chrono::Local;
use contender_logic::{Status, TestSummary};
use indicatif::{ProgressBar, ProgressStyle};

use crate::render::{pad_width, partial_note, plural, seconds, slower_note, subtitle_note, Renderer};

/// Line-oriented terminal renderer.
#[derive(Default)]
pub struct Console {
    progress: Option<ProgressBar>,
}

impl Console {
    /// A fresh console renderer.
    pub fn new() -> Self {
        Console::default()
    }

    fn line(&self, text: &str) {
        println!("[{}] {text}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Renderer for Console {
    fn start(&mut self) {
        self.line("contender benchmark");
        self.skipline(1);
    }

    fn title(&mut self, text: &str, comment: Option<&str>) {
        self.line(text.trim());
        if let Some(comment) = comment.map(str::trim).filter(|text| !text.is_empty()) {
            self.line(comment);
        }
    }

    fn subtitle(&mut self, text: &str, comment: Option<&str>, iterations: Option<u64>) {
        self.line(&format!("• {}{}", text.trim(), subtitle_note(comment, iterations)));
    }

    fn skipline(&mut self, count: usize) {
        for _ in 0..count {
            self.line("");
        }
    }

    fn progress_write(&mut self, text: &str) {
        let bar = self.progress.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        });
        bar.set_message(text.trim().to_string());
        bar.tick();
    }

    fn progress_clear(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }

    fn ignored(&mut self) {
        self.line("| Ignored");
    }

    fn results(&mut self, summaries: &[TestSummary], is_final: bool) {
        let width = pad_width(summaries);
        let best = summaries.first().and_then(|summary| summary.average);
        for summary in summaries {
            self.line(&result_row(summary, best, width, is_final));
        }
    }

    fn end(&mut self, elapsed: Duration, groups: u64, iterations: u64) {
        self.line(&format!(
            "End {}s, {groups} group{} and {iterations} iteration{}",
            seconds(elapsed),
            plural(groups),
            plural(iterations)
        ));
    }
}

/// One table row, without the time stamp. The first row of a ranked table
/// is the baseline every other success is measured against.
fn result_row(
    summary: &TestSummary,
    best: Option<Duration>,
    width: usize,
    is_final: bool,
) -> String {
    let title = format!("{:<width$}", summary.title);
    match summary.status {
        Status::Success => {
            let average = summary.average.unwrap_or_default();
            if best == Some(average) {
                format!("| {title} | {}s | baseline", seconds(average))
            } else {
                let baseline = best.unwrap_or_default();
                format!(
                    "| {title} | {}s | {}",
                    seconds(average),
                    slower_note(average, baseline)
                )
            }
        }
        Status::Partial if !is_final => {
            let average = summary.average.unwrap_or_default();
            format!("| {title} | {}s | {}", seconds(average), partial_note(summary))
        }
        Status::Failed if !is_final => {
            format!("| {title} | Failed: {}", summary.error.as_deref().unwrap_or_default())
        }
        Status::Skipped if !is_final => {
            format!("| {title} | {}", summary.error.as_deref().unwrap_or_default())
        }
        _ => format!("| {title} | Not conclusive"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use contender_core::{Outcome, Value};
    use contender_logic::{summarize, IterationVerdict};

    use super::*;

    fn verdict(status: Status, micros: u64, error: Option<&str>) -> IterationVerdict {
        IterationVerdict {
            started_at: Utc::now(),
            elapsed: Duration::from_micros(micros),
            status,
            errors: error.map(|text| vec![text.to_string()]).unwrap_or_default(),
            outcome: Outcome::from_call(Ok(Value::Null), None),
        }
    }

    #[test]
    fn baseline_and_slower_rows() {
        let fast = summarize("alpha", vec![verdict(Status::Success, 100, None)]);
        let slow = summarize("beta", vec![verdict(Status::Success, 200, None)]);
        let best = fast.average;

        assert_eq!(
            result_row(&fast, best, 5, false),
            "| alpha | 0.00010000000s | baseline"
        );
        assert_eq!(
            result_row(&slow, best, 5, false),
            "| beta  | 0.00020000000s | 100% slower (+0.00010000000s)"
        );
    }

    #[test]
    fn partial_rows_count_successes() {
        let summary = summarize(
            "gamma",
            vec![
                verdict(Status::Success, 100, None),
                verdict(Status::Failed, 100, Some("Expect return \"TEST\", actual 111")),
            ],
        );
        assert_eq!(
            result_row(&summary, summary.average, 5, false),
            "| gamma | 0.00010000000s | Partial success 1/2, failed: Expect return \"TEST\", actual 111"
        );
    }

    #[test]
    fn failed_and_skipped_rows_show_their_error() {
        let failed = summarize("delta", vec![verdict(Status::Failed, 10, Some("boom"))]);
        assert_eq!(result_row(&failed, None, 5, false), "| delta | Failed: boom");

        let skipped = summarize(
            "eps",
            vec![verdict(Status::Skipped, 0, Some("Skipped, empty callbacks..."))],
        );
        assert_eq!(
            result_row(&skipped, None, 5, false),
            "| eps   | Skipped, empty callbacks..."
        );
    }

    #[test]
    fn final_tables_collapse_unsuccessful_rows() {
        let partial = summarize(
            "a",
            vec![
                verdict(Status::Success, 10, None),
                verdict(Status::Failed, 10, Some("x")),
            ],
        );
        let failed = summarize("b", vec![verdict(Status::Failed, 10, Some("x"))]);
        let skipped = summarize("c", vec![verdict(Status::Skipped, 0, Some("x"))]);

        for summary in [&partial, &failed, &skipped] {
            assert_eq!(
                result_row(summary, None, 1, true),
                format!("| {} | Not conclusive", summary.title)
            );
        }
    }
}
