//! Shared data models for run results.

use crate::diagnostic::Severity;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
/// Counts of what the annotation sink saw during one analyzer run.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub others: usize,
    /// Lines emitted verbatim (banners, summaries, unparseable output).
    pub passthrough: usize,
}

impl Summary {
    pub fn record(&mut self, severity: &Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Other(_) => self.others += 1,
        }
    }

    pub fn findings(&self) -> usize {
        self.errors + self.warnings + self.others
    }
}
