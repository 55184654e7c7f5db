use thiserror::Error;

/// Fatal pipeline errors. Per-record failures never surface here — they are
/// captured into the run's [`atelier_core::ImportStats`] at the record
/// boundary; only run-level bookkeeping (the audit row) can abort an import
/// once it has started.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Db(#[from] atelier_db::DbError),
}
