//! Engine run metrics.
//!
//! Collected only by `Composer::run_with_metrics` (the verbose path). The
//! plain classification path does not time anything.

use std::time::Duration;

use crate::engine::report::ClassificationResult;
use crate::engine::trace::Trace;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Time spent in the script normalizer.
    pub normalize: Duration,
    /// Time spent walking the chain.
    pub evaluate: Duration,
    /// Time spent projecting the trace into a result.
    pub report: Duration,
    /// Predicates actually invoked.
    pub predicates_evaluated: usize,
    /// Predicates that returned an error or panicked.
    pub predicates_failed: usize,
    /// Predicates never reached because the chain short-circuited.
    pub predicates_skipped: usize,
}

/// Composer output bundled with its trace and timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub result: ClassificationResult,
    pub trace: Trace,
    pub metrics: RunMetrics,
}
