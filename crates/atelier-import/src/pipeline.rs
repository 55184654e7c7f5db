//! Batch orchestration for an import run.
//!
//! Candidates are processed in fixed-size batches: the records of a batch
//! run concurrently and are awaited jointly; batches themselves run
//! strictly sequentially, bounding peak concurrency to the batch size.
//! Outcomes are folded into the run's stats once per batch, at the join
//! point, and an `import_runs` audit row brackets the whole run.

use futures::future::join_all;
use sqlx::PgPool;

use atelier_core::{AppConfig, CandidateRecords, ImportStats};
use atelier_db::{complete_import_run, create_import_run, fail_import_run, start_import_run};
use atelier_media::MediaClient;

use crate::error::ImportError;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::upsert::process_candidate;

/// Runs the full import pipeline over pre-normalized candidates.
///
/// Returns the final run statistics. Per-record failures are inside the
/// stats, not the `Err` path — once started, the run processes every batch.
///
/// # Errors
///
/// Returns [`ImportError::Db`] only for run-level bookkeeping failures
/// (creating, starting, or completing the audit row).
pub async fn run_import(
    pool: &PgPool,
    media: &MediaClient,
    config: &AppConfig,
    records: &CandidateRecords,
    source_file: &str,
    format: &str,
    sink: &dyn ProgressSink,
) -> Result<ImportStats, ImportError> {
    let run = create_import_run(pool, source_file, format).await?;
    if let Err(e) = start_import_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, &format!("{e}")).await;
        return Err(e.into());
    }

    let mut stats = ImportStats::default();
    for (source_row, reason) in &records.dropped {
        stats.record_dropped(*source_row, reason);
    }
    stats.warnings.extend(records.warnings.iter().cloned());

    let batch_size = config.batch_size.max(1);
    let total_batches = records.candidates.len().div_ceil(batch_size);

    tracing::info!(
        run_id = run.id,
        candidates = records.candidates.len(),
        batch_size,
        total_batches,
        "starting import run"
    );

    for (batch_index, batch) in records.candidates.chunks(batch_size).enumerate() {
        let outcomes = join_all(
            batch
                .iter()
                .map(|candidate| process_candidate(pool, media, config, sink, candidate)),
        )
        .await;

        stats.absorb_batch(&outcomes);
        sink.emit(&ProgressEvent::batch(batch_index + 1, total_batches));
    }

    if let Err(e) = complete_import_run(pool, run.id, &stats).await {
        fail_run_best_effort(pool, run.id, &format!("{e}")).await;
        return Err(e.into());
    }

    tracing::info!(
        run_id = run.id,
        created = stats.products_created,
        updated = stats.products_updated,
        failed = stats.records_failed,
        "import run finished"
    );

    Ok(stats)
}

/// Record a `failed` status on the audit row on a best-effort basis.
async fn fail_run_best_effort(pool: &PgPool, run_id: i64, message: &str) {
    if let Err(mark_err) = fail_import_run(pool, run_id, message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to record import run failure"
        );
    }
}
