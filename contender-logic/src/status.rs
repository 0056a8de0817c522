//! Verdict states for iterations and test summaries.

use serde::{Deserialize, Serialize};

/// How an iteration, or a whole test, fared.
///
/// Declaration order is display order: summaries sort by this before any
/// other criterion, so successes lead and skipped entries trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every checked dimension matched.
    Success,
    /// Some iterations matched, some did not.
    Partial,
    /// No iteration matched.
    Failed,
    /// The pipeline was empty, nothing ran.
    Skipped,
}

impl Status {
    /// True for the two states that carry timing data.
    pub fn has_timing(self) -> bool {
        matches!(self, Status::Success | Status::Partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_puts_success_first() {
        let mut statuses = [Status::Skipped, Status::Failed, Status::Success, Status::Partial];
        statuses.sort();
        assert_eq!(
            statuses,
            [Status::Success, Status::Partial, Status::Failed, Status::Skipped]
        );
    }

    #[test]
    fn wire_tags_are_lowercase() {
        let json = serde_json::to_string(&Status::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }
}
