//! Image pipeline: walk a record's referenced image URLs, upload what the
//! asset host doesn't already have, and link the hosted copies to the
//! product.
//!
//! Every failure here is per-image: it is counted, recorded, and never
//! aborts the record, let alone the batch.

use sqlx::PgPool;

use atelier_db::{
    count_product_images, delete_product_image, insert_product_image, set_product_image_url,
    DbError,
};
use atelier_media::MediaClient;

use crate::progress::{ProgressEvent, ProgressSink};

/// Counters and captured errors from one record's image stage.
#[derive(Debug, Default)]
pub struct ImageStageOutcome {
    pub processed: u32,
    pub uploaded: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

/// Processes every image URL referenced by a record, in order.
///
/// Already-hosted URLs are linked without an upload; everything else goes
/// through the client's bounded retry. The first image successfully linked
/// to a product that had none becomes primary, and the first URL in the
/// list (the main image) rewrites `products.image_url` to its hosted copy.
pub async fn process_candidate_images(
    pool: &PgPool,
    media: &MediaClient,
    product_id: i64,
    source_row: usize,
    image_urls: &[String],
    sink: &dyn ProgressSink,
) -> ImageStageOutcome {
    let mut outcome = ImageStageOutcome::default();
    if image_urls.is_empty() {
        return outcome;
    }

    let mut next_is_primary = match count_product_images(pool, product_id).await {
        Ok(count) => count == 0,
        Err(e) => {
            outcome
                .errors
                .push(format!("could not count existing images: {e}"));
            false
        }
    };

    for (position, url) in image_urls.iter().enumerate() {
        outcome.processed += 1;

        let hosted = if media.is_hosted(url) {
            url.clone()
        } else {
            match media.upload_source_url(url).await {
                Ok(hosted) => {
                    outcome.uploaded += 1;
                    hosted
                }
                Err(e) => {
                    outcome.failed += 1;
                    outcome.errors.push(format!("image {url}: {e}"));
                    sink.emit(&ProgressEvent::ImageProcessed {
                        source_row,
                        succeeded: false,
                    });
                    continue;
                }
            }
        };

        let sort_order = i32::try_from(position).unwrap_or(i32::MAX);
        match insert_product_image(pool, product_id, &hosted, next_is_primary, sort_order).await {
            Ok(_) => {
                next_is_primary = false;
            }
            Err(e) => {
                outcome.failed += 1;
                outcome
                    .errors
                    .push(format!("could not link image {hosted}: {e}"));
                sink.emit(&ProgressEvent::ImageProcessed {
                    source_row,
                    succeeded: false,
                });
                continue;
            }
        }

        // The main image reference follows its hosted copy.
        if position == 0 {
            if let Err(e) = set_product_image_url(pool, product_id, &hosted).await {
                outcome
                    .errors
                    .push(format!("could not update main image reference: {e}"));
            }
        }

        sink.emit(&ProgressEvent::ImageProcessed {
            source_row,
            succeeded: true,
        });
    }

    outcome
}

/// Interactive-editor image deletion: the database row goes first, then the
/// remote asset on a best-effort basis. A remote-delete failure is logged
/// and does not restore the already-deleted row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no image has that id, or the database
/// error that prevented the row deletion.
pub async fn delete_image(
    pool: &PgPool,
    media: &MediaClient,
    image_id: i64,
) -> Result<(), DbError> {
    let row = delete_product_image(pool, image_id).await?;

    if media.is_hosted(&row.url) {
        if let Err(e) = media.delete_asset(&row.url).await {
            tracing::warn!(
                image_id,
                url = %row.url,
                error = %e,
                "remote asset delete failed; database row already removed"
            );
        }
    }

    Ok(())
}
