//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::CandidateProduct;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    /// Shopify handle when the product came in through a Shopify import.
    pub handle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the product with an exact, case-sensitive `name` match.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_name(pool: &PgPool, name: &str) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, public_id, name, description, price, category_id, image_url, \
                is_featured, is_active, handle, created_at, updated_at \
         FROM products \
         WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the product carrying the given Shopify handle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_handle(
    pool: &PgPool,
    handle: &str,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, public_id, name, description, price, category_id, image_url, \
                is_featured, is_active, handle, created_at, updated_at \
         FROM products \
         WHERE handle = $1",
    )
    .bind(handle)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a new product from an import candidate.
///
/// The create path is the only writer of `name` and `handle`; updates never
/// touch either (see [`update_product`]).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including unique-constraint
/// violations on `name` or `handle`.
pub async fn insert_product(
    pool: &PgPool,
    candidate: &CandidateProduct,
    category_id: Option<i64>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (name, description, price, category_id, image_url, is_featured, handle) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(&candidate.name)
    .bind(&candidate.description)
    .bind(candidate.price)
    .bind(category_id)
    .bind(candidate.image_urls.first())
    .bind(candidate.is_featured)
    .bind(&candidate.handle)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Updates a product's mutable fields from an import candidate.
///
/// `name` is deliberately absent from the SET list: the lookup key on the
/// flat-template path is the name itself, and on the Shopify path the handle
/// is treated as immutable identity — a changed `Title` on re-import does
/// not rename the stored product.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    candidate: &CandidateProduct,
    category_id: Option<i64>,
) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE products SET \
             description = $2, \
             price       = $3, \
             category_id = $4, \
             image_url   = COALESCE($5, image_url), \
             is_featured = $6, \
             updated_at  = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&candidate.description)
    .bind(candidate.price)
    .bind(category_id)
    .bind(candidate.image_urls.first())
    .bind(candidate.is_featured)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Rewrites `products.image_url`, used when the image pipeline has uploaded
/// the main image and the reference must point at the hosted copy.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn set_product_image_url(pool: &PgPool, id: i64, url: &str) -> Result<(), DbError> {
    let rows_affected =
        sqlx::query("UPDATE products SET image_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(url)
            .execute(pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
