//! Run configuration, loadable from `contender.toml`.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use contender_core::{Formatter, DEFAULT_LIMIT};
use contender_report::RendererKind;

use crate::suite::Group;

/// Settings shared by a whole run.
///
/// Every field has a default, so a missing or partial `contender.toml` still
/// produces a working configuration. Per-group overrides are merged through
/// [`effective_iterations`](RunConfig::effective_iterations).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Iterations per test for groups without an override. Clamped to 1.
    pub iterations: u64,
    /// Skips the cross-run "End result" section.
    pub ignore_final: bool,
    /// Clip width for diagnostic values, in characters.
    pub truncate: usize,
    /// Which bundled renderer to use.
    pub renderer: RendererKind,
    /// Regex over test titles; non-matching tests do not run.
    pub filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            iterations: default_iterations(),
            ignore_final: false,
            truncate: default_truncate(),
            renderer: RendererKind::default(),
            filter: None,
        }
    }
}

fn default_iterations() -> u64 {
    1
}

fn default_truncate() -> usize {
    DEFAULT_LIMIT
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Walks up from the current directory looking for `contender.toml`.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join("contender.toml");
            if candidate.exists() {
                return Self::load(&candidate).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Iterations a group actually runs: its own override when set, else the
    /// run default, never less than 1.
    pub fn effective_iterations(&self, group: &Group) -> u64 {
        group.iterations.unwrap_or(self.iterations).max(1)
    }

    /// The diagnostic formatter this configuration implies.
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.truncate)
    }
}
