//! Shared lookup tables: categories, sizes, frame types.
//!
//! All creation goes through single-statement atomic get-or-create upserts
//! (`ON CONFLICT ... DO UPDATE ... RETURNING`), so two records in the same
//! batch referencing the same new value cannot race into duplicate rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `sizes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SizeRow {
    pub id: i64,
    pub name: String,
    /// Short code used as the size fragment of generated SKUs.
    pub code: String,
    /// Placeholder text until someone fills in real measurements.
    pub dimensions: Option<String>,
    pub price_adjustment: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `frame_types` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FrameTypeRow {
    pub id: i64,
    pub name: String,
    pub material: Option<String>,
    pub price_adjustment: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Get-or-create upserts
// ---------------------------------------------------------------------------

/// Returns the category named `name`, creating it if absent.
///
/// The no-op `DO UPDATE` makes the statement always return the row, whether
/// it inserted or found an existing one; `xmax = 0` marks a freshly
/// inserted row, which feeds the run's categories-created counter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn get_or_create_category(
    pool: &PgPool,
    name: &str,
) -> Result<(CategoryRow, bool), DbError> {
    let (id, name, created_at, updated_at, created): (
        i64,
        String,
        DateTime<Utc>,
        DateTime<Utc>,
        bool,
    ) = sqlx::query_as(
        "INSERT INTO categories (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id, name, created_at, updated_at, (xmax = 0) AS created",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok((
        CategoryRow {
            id,
            name,
            created_at,
            updated_at,
        },
        created,
    ))
}

/// Returns the size named `name`, creating it on demand with a derived
/// short code and placeholder dimensions.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn get_or_create_size(pool: &PgPool, name: &str) -> Result<(SizeRow, bool), DbError> {
    let code = derive_code(name);
    let (id, name, code, dimensions, price_adjustment, created_at, updated_at, created): (
        i64,
        String,
        String,
        Option<String>,
        Decimal,
        DateTime<Utc>,
        DateTime<Utc>,
        bool,
    ) = sqlx::query_as(
        "INSERT INTO sizes (name, code, dimensions) VALUES ($1, $2, 'TBD') \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id, name, code, dimensions, price_adjustment, created_at, updated_at, \
                   (xmax = 0) AS created",
    )
    .bind(name)
    .bind(code)
    .fetch_one(pool)
    .await?;

    Ok((
        SizeRow {
            id,
            name,
            code,
            dimensions,
            price_adjustment,
            created_at,
            updated_at,
        },
        created,
    ))
}

/// Returns the frame type named `name`, creating it on demand with
/// placeholder material text.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn get_or_create_frame_type(
    pool: &PgPool,
    name: &str,
) -> Result<(FrameTypeRow, bool), DbError> {
    let (id, name, material, price_adjustment, created_at, updated_at, created): (
        i64,
        String,
        Option<String>,
        Decimal,
        DateTime<Utc>,
        DateTime<Utc>,
        bool,
    ) = sqlx::query_as(
        "INSERT INTO frame_types (name, material) VALUES ($1, 'TBD') \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id, name, material, price_adjustment, created_at, updated_at, \
                   (xmax = 0) AS created",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok((
        FrameTypeRow {
            id,
            name,
            material,
            price_adjustment,
            created_at,
            updated_at,
        },
        created,
    ))
}

/// Derives a lookup short code: lower-cased, non-alphanumerics stripped,
/// at most 8 characters. `"Extra Large"` becomes `"extralar"`.
#[must_use]
pub fn derive_code(name: &str) -> String {
    let code: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(8)
        .collect();
    if code.is_empty() {
        "option".to_string()
    } else {
        code
    }
}
