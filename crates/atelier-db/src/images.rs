//! Database operations for the `product_images` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `product_images` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImageRow {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Returns all images of a product, primary first, then by sort order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_product_images(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ProductImageRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductImageRow>(
        "SELECT id, product_id, url, is_primary, sort_order, created_at \
         FROM product_images \
         WHERE product_id = $1 \
         ORDER BY is_primary DESC, sort_order, id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the number of images recorded for a product.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_product_images(pool: &PgPool, product_id: i64) -> Result<i64, DbError> {
    let count: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_images WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// Records an image URL for a product. Idempotent on `(product_id, url)`:
/// re-importing a file never duplicates image rows.
///
/// Returns the new row's id, or `None` when the URL was already recorded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product_image(
    pool: &PgPool,
    product_id: i64,
    url: &str,
    is_primary: bool,
    sort_order: i32,
) -> Result<Option<i64>, DbError> {
    let id: Option<i64> = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_images (product_id, url, is_primary, sort_order) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (product_id, url) DO NOTHING \
         RETURNING id",
    )
    .bind(product_id)
    .bind(url)
    .bind(is_primary)
    .bind(sort_order)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Deletes an image row, returning it so the caller can best-effort delete
/// the remote asset afterwards. The row goes first; a failed remote delete
/// never restores it.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_product_image(pool: &PgPool, id: i64) -> Result<ProductImageRow, DbError> {
    let row = sqlx::query_as::<_, ProductImageRow>(
        "DELETE FROM product_images WHERE id = $1 \
         RETURNING id, product_id, url, is_primary, sort_order, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}
