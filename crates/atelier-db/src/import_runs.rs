//! Audit trail for import runs: one row per run, carrying lifecycle status
//! and the final counters for the back-office run history view.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::ImportStats;

use crate::DbError;

/// A row from the `import_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImportRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub source_file: String,
    pub format: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub products_created: i32,
    pub products_updated: i32,
    pub variations_created: i32,
    pub images_uploaded: i32,
    pub records_failed: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Creates a `queued` run row for a new import.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_import_run(
    pool: &PgPool,
    source_file: &str,
    format: &str,
) -> Result<ImportRunRow, DbError> {
    let row = sqlx::query_as::<_, ImportRunRow>(
        "INSERT INTO import_runs (source_file, format) VALUES ($1, $2) \
         RETURNING id, public_id, source_file, format, status, started_at, completed_at, \
                   products_created, products_updated, variations_created, images_uploaded, \
                   records_failed, error_message, created_at",
    )
    .bind(source_file)
    .bind(format)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run `running` and stamps `started_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn start_import_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE import_runs SET status = 'running', started_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Marks a run `succeeded` and writes the final counters.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn complete_import_run(
    pool: &PgPool,
    id: i64,
    stats: &ImportStats,
) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE import_runs SET \
             status             = 'succeeded', \
             completed_at       = NOW(), \
             products_created   = $2, \
             products_updated   = $3, \
             variations_created = $4, \
             images_uploaded    = $5, \
             records_failed     = $6 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(i32::try_from(stats.products_created).unwrap_or(i32::MAX))
    .bind(i32::try_from(stats.products_updated).unwrap_or(i32::MAX))
    .bind(i32::try_from(stats.variations_created).unwrap_or(i32::MAX))
    .bind(i32::try_from(stats.images_uploaded).unwrap_or(i32::MAX))
    .bind(i32::try_from(stats.records_failed).unwrap_or(i32::MAX))
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Marks a run `failed` with an error message.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn fail_import_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE import_runs SET status = 'failed', completed_at = NOW(), error_message = $2 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(error_message)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Returns one run by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_import_run(pool: &PgPool, id: i64) -> Result<Option<ImportRunRow>, DbError> {
    let row = sqlx::query_as::<_, ImportRunRow>(
        "SELECT id, public_id, source_file, format, status, started_at, completed_at, \
                products_created, products_updated, variations_created, images_uploaded, \
                records_failed, error_message, created_at \
         FROM import_runs \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
