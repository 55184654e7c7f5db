//! Progress events for operator-facing UIs.
//!
//! The pipeline emits one event after every completed batch and one after
//! every processed image — a plain counter broadcast, not a state machine.
//! Sinks are shared across the concurrent record tasks of a batch, so the
//! trait is `Send + Sync` and emission never blocks.

use atelier_core::progress_percent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A batch's futures have all settled and its outcomes were folded.
    BatchCompleted {
        completed_batches: usize,
        total_batches: usize,
        percent: u8,
    },
    /// One image finished processing (uploaded, skipped as hosted, or
    /// given up on).
    ImageProcessed { source_row: usize, succeeded: bool },
}

impl ProgressEvent {
    #[must_use]
    pub fn batch(completed_batches: usize, total_batches: usize) -> Self {
        ProgressEvent::BatchCompleted {
            completed_batches,
            total_batches,
            percent: progress_percent(completed_batches, total_batches),
        }
    }
}

/// Receives pipeline progress. Implementations must be cheap and
/// non-blocking; they run inline in the record tasks.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

/// Default sink: structured log lines, no operator UI.
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::BatchCompleted {
                completed_batches,
                total_batches,
                percent,
            } => {
                tracing::info!(completed_batches, total_batches, percent, "batch completed");
            }
            ProgressEvent::ImageProcessed {
                source_row,
                succeeded,
            } => {
                tracing::debug!(source_row, succeeded, "image processed");
            }
        }
    }
}
