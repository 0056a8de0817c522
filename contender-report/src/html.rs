//! Self-contained HTML output.
//!
//! Streams the same narration as the console into a dark monospace page.
//! Progress lines are tagged `.tmp` and removed by a small script when
//! cleared, so a browser following the stream sees them overwrite each
//! other. Write failures are ignored, rendering never aborts a run.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use chrono::Local;
use contender_logic::{Status, TestSummary};

use crate::render::{pad_width, partial_note, plural, seconds, slower_note, subtitle_note, Renderer};

const PAGE_HEAD: &str = "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<title>Contender Benchmark</title>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<style>\n\
*{font-size:14px;font-family:Consolas,monospace;background:#111;color:#ddd}\n\
.bold{font-weight:bold}\n\
.italic{font-style:italic}\n\
.dim{color:#777}\n\
.warn{color:#f88d00}\n\
.fail{color:#f80000}\n\
.info{color:#00b6f8}\n\
</style>\n\
</head>\n\
<body>\n";

const PAGE_FOOT: &str = "</body>\n</html>\n";

/// Streaming HTML renderer over any writer.
pub struct Html<W: Write> {
    writer: W,
}

impl<W: Write> Html<W> {
    /// Renders into `writer`.
    pub fn new(writer: W) -> Self {
        Html { writer }
    }

    /// Hands the writer back, e.g. to flush or inspect the page.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn stamped(&mut self, body: &str) {
        let _ = write!(
            self.writer,
            "<span class='dim'>[{}] {body}</span>\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }

    fn row(&self, summary: &TestSummary, best: Option<Duration>, width: usize, is_final: bool) -> String {
        let title = escape(&format!("{:<width$}", summary.title)).replace(' ', "&nbsp;");
        match summary.status {
            Status::Success => {
                let average = summary.average.unwrap_or_default();
                if best == Some(average) {
                    format!("<span>| {title} | {}s | baseline</span>", seconds(average))
                } else {
                    let baseline = best.unwrap_or_default();
                    format!(
                        "<span>| {title} | {}s | {}</span>",
                        seconds(average),
                        slower_note(average, baseline)
                    )
                }
            }
            Status::Partial if !is_final => {
                let average = summary.average.unwrap_or_default();
                format!(
                    "<span>| {title} | {}s | </span><span class='italic warn'>{}</span>",
                    seconds(average),
                    escape(&partial_note(summary))
                )
            }
            Status::Failed if !is_final => format!(
                "<span>| {title} | </span><span class='italic fail'>Failed: {}</span>",
                escape(summary.error.as_deref().unwrap_or_default())
            ),
            Status::Skipped if !is_final => format!(
                "<span>| {title} | </span><span class='italic dim'>{}</span>",
                escape(summary.error.as_deref().unwrap_or_default())
            ),
            _ => format!(
                "<span>| {title} | </span><span class='italic dim'>Not conclusive</span>"
            ),
        }
    }
}

impl<W: Write> fmt::Debug for Html<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Html").finish_non_exhaustive()
    }
}

impl<W: Write> Renderer for Html<W> {
    fn start(&mut self) {
        let _ = self.writer.write_all(PAGE_HEAD.as_bytes());
        self.stamped("<span class='italic dim'>contender benchmark</span><br>");
        self.skipline(1);
    }

    fn title(&mut self, text: &str, comment: Option<&str>) {
        self.stamped(&format!(
            "<span class='bold italic'>{}</span><br>",
            escape(text.trim())
        ));
        if let Some(comment) = comment.map(str::trim).filter(|text| !text.is_empty()) {
            self.stamped(&format!("<span class='bold italic'>{}</span><br>", escape(comment)));
        }
    }

    fn subtitle(&mut self, text: &str, comment: Option<&str>, iterations: Option<u64>) {
        self.stamped(&format!(
            "<span class='info'>• {}</span><span class='dim'>{}</span><br>",
            escape(text.trim()),
            escape(&subtitle_note(comment, iterations))
        ));
    }

    fn skipline(&mut self, count: usize) {
        for _ in 0..count {
            self.stamped("<br>");
        }
    }

    fn progress_write(&mut self, text: &str) {
        self.stamped(&format!("<span class='dim tmp'>{}</span>", escape(text.trim())));
    }

    fn progress_clear(&mut self) {
        let _ = self.writer.write_all(
            b"<script>document.querySelectorAll('.tmp').forEach(e => e.parentNode.remove())</script>\n",
        );
    }

    fn ignored(&mut self) {
        self.stamped("<span>| Ignored</span><br>");
    }

    fn results(&mut self, summaries: &[TestSummary], is_final: bool) {
        let width = pad_width(summaries);
        let best = summaries.first().and_then(|summary| summary.average);
        for summary in summaries {
            let row = self.row(summary, best, width, is_final);
            self.stamped(&format!("{row}<br>"));
        }
    }

    fn end(&mut self, elapsed: Duration, groups: u64, iterations: u64) {
        self.stamped(&format!(
            "<span class='italic dim'>End {}s, {groups} group{} and {iterations} iteration{}</span><br>",
            seconds(elapsed),
            plural(groups),
            plural(iterations)
        ));
        let _ = self.writer.write_all(PAGE_FOOT.as_bytes());
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
