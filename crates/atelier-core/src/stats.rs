//! Run statistics for the import pipeline.
//!
//! Each record produces one immutable [`RecordOutcome`]; the pipeline folds
//! outcomes into an [`ImportStats`] at the batch join point. Nothing here is
//! shared mutable state — aggregation happens once per batch, after all of
//! the batch's futures have settled.

use serde::{Deserialize, Serialize};

/// What happened to a single candidate product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Created,
    Updated,
    /// The product write itself failed; nothing was committed for the record.
    Failed,
}

/// Immutable result of processing one candidate record, produced by the
/// upsert engine and folded into [`ImportStats`] by the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// 1-based data-row number in the source file.
    pub source_row: usize,
    pub product_name: String,
    pub status: RecordStatus,
    pub variations_created: u32,
    pub variations_updated: u32,
    pub variations_pruned: u32,
    pub images_processed: u32,
    pub images_uploaded: u32,
    pub images_failed: u32,
    pub category_created: bool,
    /// Captured per-record errors. A non-empty list with `status != Failed`
    /// means the product committed but a later side effect (variations,
    /// images) did not — accepted partial success, not a rollback trigger.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RecordOutcome {
    /// A skeleton outcome for a record that has not committed anything yet.
    #[must_use]
    pub fn failed(source_row: usize, product_name: &str, error: String) -> Self {
        Self {
            source_row,
            product_name: product_name.to_string(),
            status: RecordStatus::Failed,
            variations_created: 0,
            variations_updated: 0,
            variations_pruned: 0,
            images_processed: 0,
            images_uploaded: 0,
            images_failed: 0,
            category_created: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

/// Aggregate counters for a whole import run.
///
/// Built by folding [`RecordOutcome`]s; also carries the rows dropped during
/// mapping so the end-of-run summary covers the full input file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    /// Candidates handed to the pipeline (dropped rows not included).
    pub total_candidates: u32,
    pub products_created: u32,
    pub products_updated: u32,
    pub records_failed: u32,
    pub variations_created: u32,
    pub variations_updated: u32,
    pub variations_pruned: u32,
    pub images_processed: u32,
    pub images_uploaded: u32,
    pub images_failed: u32,
    pub categories_created: u32,
    /// Rows excluded during mapping, before the pipeline ran.
    pub records_dropped: u32,
    /// Human-readable error strings, each prefixed with the 1-based source
    /// row where one applies.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportStats {
    /// Folds one record outcome into the aggregate.
    pub fn absorb(&mut self, outcome: &RecordOutcome) {
        self.total_candidates += 1;
        match outcome.status {
            RecordStatus::Created => self.products_created += 1,
            RecordStatus::Updated => self.products_updated += 1,
            RecordStatus::Failed => self.records_failed += 1,
        }
        self.variations_created += outcome.variations_created;
        self.variations_updated += outcome.variations_updated;
        self.variations_pruned += outcome.variations_pruned;
        self.images_processed += outcome.images_processed;
        self.images_uploaded += outcome.images_uploaded;
        self.images_failed += outcome.images_failed;
        if outcome.category_created {
            self.categories_created += 1;
        }
        self.errors.extend(
            outcome
                .errors
                .iter()
                .map(|e| format!("row {}: {e}", outcome.source_row)),
        );
        self.warnings.extend(
            outcome
                .warnings
                .iter()
                .map(|w| format!("row {}: {w}", outcome.source_row)),
        );
    }

    /// Folds a whole batch of outcomes, in order.
    pub fn absorb_batch<'a, I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = &'a RecordOutcome>,
    {
        for outcome in outcomes {
            self.absorb(outcome);
        }
    }

    /// Records a row dropped during mapping, with its reason in the error
    /// list so the operator sees why the row never reached the pipeline.
    pub fn record_dropped(&mut self, source_row: usize, reason: &str) {
        self.records_dropped += 1;
        self.errors.push(format!("row {source_row}: {reason}"));
    }
}

/// Integer progress percentage: `completed / total × 100`.
///
/// Saturates at 100 and treats `total == 0` as fully complete so callers
/// never divide by zero on an empty batch list.
#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 || completed >= total {
        return 100;
    }
    u8::try_from(completed * 100 / total).unwrap_or(100)
}
