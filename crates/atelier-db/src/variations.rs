//! Database operations for the `product_variations` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `product_variations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariationRow {
    pub id: i64,
    pub product_id: i64,
    pub size_id: i64,
    pub frame_type_id: i64,
    pub sku: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns all variations of a product, ordered by id for stable display.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_variations(pool: &PgPool, product_id: i64) -> Result<Vec<VariationRow>, DbError> {
    let rows = sqlx::query_as::<_, VariationRow>(
        "SELECT id, product_id, size_id, frame_type_id, sku, price, stock_quantity, \
                is_active, created_at, updated_at \
         FROM product_variations \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a variation for a (size, frame) pair.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails — a unique violation on
/// `sku` or on `(product_id, size_id, frame_type_id)` surfaces here.
pub async fn insert_variation(
    pool: &PgPool,
    product_id: i64,
    size_id: i64,
    frame_type_id: i64,
    sku: &str,
    price: Decimal,
    stock_quantity: i32,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_variations \
             (product_id, size_id, frame_type_id, sku, price, stock_quantity) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(product_id)
    .bind(size_id)
    .bind(frame_type_id)
    .bind(sku)
    .bind(price)
    .bind(stock_quantity)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Updates a kept variation's price and stock during reconciliation. The
/// SKU and (size, frame) identity never change on update.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_variation(
    pool: &PgPool,
    id: i64,
    price: Decimal,
    stock_quantity: i32,
) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE product_variations SET price = $2, stock_quantity = $3, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(price)
    .bind(stock_quantity)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Returns `true` if any variation already carries `sku`. SKUs are globally
/// unique; the generator queries this before committing a candidate SKU.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sku_exists(pool: &PgPool, sku: &str) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM product_variations WHERE sku = $1)",
    )
    .bind(sku)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Deletes the given variation rows. Used by the prune step when stored
/// variations fall outside the desired size×frame set on re-import.
///
/// Returns the number of rows deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_variations(pool: &PgPool, ids: &[i64]) -> Result<u64, DbError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let deleted = sqlx::query("DELETE FROM product_variations WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted)
}
