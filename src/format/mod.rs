//! Output formatting for `dectest`.
//!
//! Human mode prints one diagnostic per failed test on stderr and the
//! summary line on stdout. JSON mode prints a single [`Report`] on stdout.
//!
//! # Output Types
//!
//! - [`Report`] - counters plus every failure, serialized for `--json`

use crate::model::{FailureRecord, RunCounters};
use serde::Serialize;

/// Everything a finished run has to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub counters: RunCounters,
    pub failures: Vec<FailureRecord>,
}

impl Report {
    #[must_use]
    pub const fn new(counters: RunCounters, failures: Vec<FailureRecord>) -> Self {
        Self { counters, failures }
    }

    /// Pretty JSON for `--json`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `"<total> tests. <succeeded> successful, <failed> failed, <skipped> skipped"`
#[must_use]
pub fn summary_line(counters: &RunCounters) -> String {
    format!(
        "{} tests. {} successful, {} failed, {} skipped",
        counters.total, counters.succeeded, counters.failed, counters.skipped
    )
}

/// One-line diagnostic for a failed test.
#[must_use]
pub fn failure_line(record: &FailureRecord) -> String {
    format!(
        "failed test: {}, {} != {}, precision: {}, rounding mode: {}",
        record.line, record.computed, record.expected, record.precision, record.rounding
    )
}
