//! Image URL verification for stored product images.

use futures::stream::{self, StreamExt};
use reqwest::StatusCode;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ImageCheckRow {
    product_name: String,
    url: String,
}

/// Verify every product image URL currently stored in the database.
///
/// Logs non-200 URLs for cleanup and prints aggregate totals.
pub async fn run(pool: &sqlx::PgPool, concurrency: usize) -> anyhow::Result<()> {
    let rows = sqlx::query_as::<_, ImageCheckRow>(
        "SELECT p.name AS product_name, i.url \
         FROM product_images i \
         JOIN products p ON p.id = i.product_id \
         ORDER BY p.name, i.sort_order",
    )
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        println!("no image URLs found to verify");
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(12))
        .user_agent("atelier-verifier/1.0")
        .build()?;

    let checks = stream::iter(rows.into_iter().map(|row| {
        let client = client.clone();
        async move {
            let result = client.head(&row.url).send().await;
            (row, result)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut ok_count = 0usize;
    let mut bad_count = 0usize;
    for (row, result) in checks {
        match result {
            Ok(resp) if resp.status() == StatusCode::OK => {
                ok_count += 1;
            }
            Ok(resp) => {
                bad_count += 1;
                tracing::warn!(
                    product = %row.product_name,
                    status = resp.status().as_u16(),
                    url = %row.url,
                    "image URL verification failed"
                );
            }
            Err(e) => {
                bad_count += 1;
                tracing::warn!(
                    product = %row.product_name,
                    error = %e,
                    url = %row.url,
                    "image URL verification failed"
                );
            }
        }
    }

    println!("verified image URLs: {ok_count} OK, {bad_count} bad");
    Ok(())
}
