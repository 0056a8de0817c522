#![warn(missing_docs)]
//! Contender Report - Renderers
//!
//! Output targets for a benchmark run:
//! - `Console` (timestamped terminal lines with an ephemeral progress line)
//! - `Html` (self-contained streaming page)
//! - `Null` (discards everything)
//!
//! All of them implement the `Renderer` narration trait the run loop talks
//! to.

mod console;
mod html;
mod render;

pub use console::Console;
pub use html::Html;
pub use render::{Null, Renderer};

use serde::{Deserialize, Serialize};

/// Renderer selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Timestamped terminal output
    #[default]
    Console,
    /// Streaming HTML page on stdout
    Html,
    /// No output
    Null,
}

impl RendererKind {
    /// Builds the renderer this kind names.
    pub fn create(self) -> Box<dyn Renderer> {
        match self {
            RendererKind::Console => Box::new(Console::new()),
            RendererKind::Html => Box::new(Html::new(std::io::stdout())),
            RendererKind::Null => Box::new(Null),
        }
    }
}

impl std::str::FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Ok(RendererKind::Console),
            "html" => Ok(RendererKind::Html),
            "null" | "none" => Ok(RendererKind::Null),
            other => Err(format!("Unknown renderer: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_config_strings() {
        assert_eq!("console".parse::<RendererKind>(), Ok(RendererKind::Console));
        assert_eq!("HTML".parse::<RendererKind>(), Ok(RendererKind::Html));
        assert_eq!("none".parse::<RendererKind>(), Ok(RendererKind::Null));
        assert!("pdf".parse::<RendererKind>().is_err());
    }

    #[test]
    fn null_renderer_swallows_the_whole_narration() {
        let mut renderer = RendererKind::Null.create();
        renderer.start();
        renderer.title("quiet", None);
        renderer.progress_write("ignored");
        renderer.progress_clear();
        renderer.results(&[], true);
        renderer.end(std::time::Duration::ZERO, 0, 0);
    }
}
