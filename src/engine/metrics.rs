//! Run metrics.
//!
//! Small structs used to observe a parse or resolution pass: timings plus
//! the counts a report needs. Collection is cheap and always on; nothing
//! here allocates per statement.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// Counts and timing for one [`Parser`](super::Parser) run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseMetrics {
    /// Elapsed time for the whole source.
    pub duration: Duration,
    /// Source lines seen, including blanks and comments.
    pub lines: usize,
    /// Statements accepted per section.
    pub vowel: usize,
    pub initial: usize,
    pub final_: usize,
    /// Line errors collected.
    pub errors: usize,
}

impl ParseMetrics {
    pub fn statements(&self) -> usize {
        self.vowel + self.initial + self.final_
    }
}

/// Counts and timing for one [`Resolver`](super::Resolver) pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Statements walked.
    pub statements: usize,
    /// Sub-table bindings created by the pass.
    pub assigned: usize,
    /// Sub-table bindings left alone because the name was already bound.
    pub skipped: usize,
}
