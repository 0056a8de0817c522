//! The rendering seam between the run loop and its output.
//!
//! The run loop narrates itself through this trait: a banner, one subtitle
//! per group, an ephemeral progress line while iterations run, a ranked
//! result table per group, one more for the cross-run fold, and a closing
//! line. Renderers only ever receive finished summaries; nothing here can
//! reach back into the run.

use std::time::Duration;

use contender_logic::{Status, TestSummary};

/// Output target for a run.
///
/// Methods are called in a fixed narration order; implementations are free
/// to ignore any of them.
pub trait Renderer {
    /// The run is about to begin.
    fn start(&mut self);

    /// Suite heading.
    fn title(&mut self, text: &str, comment: Option<&str>);

    /// Group heading. `iterations` is present for groups, absent for the
    /// final cross-run section.
    fn subtitle(&mut self, text: &str, comment: Option<&str>, iterations: Option<u64>);

    /// Vertical whitespace.
    fn skipline(&mut self, count: usize);

    /// Ephemeral status line, overwritten by the next write.
    fn progress_write(&mut self, text: &str);

    /// Removes the ephemeral status line.
    fn progress_clear(&mut self);

    /// Marker for a group whose results are excluded from the fold.
    fn ignored(&mut self);

    /// Ranked result table. `is_final` marks the cross-run fold, where
    /// unsuccessful entries collapse to a "Not conclusive" note.
    fn results(&mut self, summaries: &[TestSummary], is_final: bool);

    /// The run finished.
    fn end(&mut self, elapsed: Duration, groups: u64, iterations: u64);
}

/// Discards everything. Useful when only the returned report matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl Renderer for Null {
    fn start(&mut self) {}
    fn title(&mut self, _text: &str, _comment: Option<&str>) {}
    fn subtitle(&mut self, _text: &str, _comment: Option<&str>, _iterations: Option<u64>) {}
    fn skipline(&mut self, _count: usize) {}
    fn progress_write(&mut self, _text: &str) {}
    fn progress_clear(&mut self) {}
    fn ignored(&mut self) {}
    fn results(&mut self, _summaries: &[TestSummary], _is_final: bool) {}
    fn end(&mut self, _elapsed: Duration, _groups: u64, _iterations: u64) {}
}

pub(crate) fn seconds(duration: Duration) -> String {
    format!("{:.11}", duration.as_secs_f64())
}

pub(crate) fn plural(count: u64) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// Column width for the title column of a result table.
pub(crate) fn pad_width(summaries: &[TestSummary]) -> usize {
    summaries
        .iter()
        .map(|summary| summary.title.trim().chars().count())
        .max()
        .unwrap_or(0)
}

/// The dim note after a subtitle: iteration count, comment, or both.
pub(crate) fn subtitle_note(comment: Option<&str>, iterations: Option<u64>) -> String {
    let times = iterations
        .map(|count| format!(" {count} time{}", plural(count)))
        .unwrap_or_default();
    let comment = match comment.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) if !times.is_empty() => format!(" - {text}"),
        Some(text) => format!(" {text}"),
        None => String::new(),
    };
    format!("{times}{comment}")
}

/// How much slower an entry is than the table's baseline.
pub(crate) fn slower_note(average: Duration, best: Duration) -> String {
    let ratio = average.as_secs_f64() / best.as_secs_f64();
    let percent = ((1.0 - ratio) * 100.0 * -1.0 * 10.0).round() / 10.0;
    format!("{percent}% slower (+{}s)", seconds(average - best))
}

/// The note for a partially successful entry.
pub(crate) fn partial_note(summary: &TestSummary) -> String {
    let succeeded = summary
        .iterations
        .iter()
        .filter(|verdict| verdict.status == Status::Success)
        .count();
    format!(
        "Partial success {succeeded}/{}, failed: {}",
        summary.iterations.len(),
        summary.error.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_keep_eleven_decimals() {
        assert_eq!(seconds(Duration::from_millis(1500)), "1.50000000000");
        assert_eq!(seconds(Duration::ZERO), "0.00000000000");
    }

    #[test]
    fn subtitle_notes_join_count_and_comment() {
        assert_eq!(subtitle_note(None, None), "");
        assert_eq!(subtitle_note(None, Some(1)), " 1 time");
        assert_eq!(subtitle_note(None, Some(3)), " 3 times");
        assert_eq!(subtitle_note(Some("warm cache"), None), " warm cache");
        assert_eq!(subtitle_note(Some("warm cache"), Some(3)), " 3 times - warm cache");
        assert_eq!(subtitle_note(Some("  "), Some(2)), " 2 times");
    }

    #[test]
    fn slower_notes_round_to_one_decimal() {
        assert_eq!(
            slower_note(Duration::from_secs(2), Duration::from_secs(1)),
            "100% slower (+1.00000000000s)"
        );
        assert_eq!(
            slower_note(Duration::from_millis(1500), Duration::from_secs(1)),
            "50% slower (+0.50000000000s)"
        );
        assert_eq!(
            slower_note(Duration::from_millis(1333), Duration::from_secs(1)),
            "33.3% slower (+0.33300000000s)"
        );
    }
}
