//! Scoped capture of text emitted during a single stage call.
//!
//! Each invocation gets a fresh [`Capture`] handed to the stage body. The
//! executor drains it on every exit path, normal or thrown, so no text ever
//! leaks from one call into the next.

use std::fmt;

/// Per-invocation sink for text a stage wants to emit.
///
/// Implements [`fmt::Write`], so `write!(cap, ...)` works alongside the
/// plain [`print`](Capture::print) helper.
#[derive(Debug, Default)]
pub struct Capture {
    buf: String,
}

impl Capture {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a piece of text.
    pub fn print(&mut self, text: impl AsRef<str>) {
        self.buf.push_str(text.as_ref());
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drains the capture, yielding `None` when nothing was emitted.
    pub fn into_text(self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf)
        }
    }
}

impl fmt::Write for Capture {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
