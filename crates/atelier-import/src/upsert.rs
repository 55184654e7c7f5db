//! Per-record upsert engine.
//!
//! One candidate in, one [`RecordOutcome`] out. The side-effect order is
//! product upsert → variation reconciliation → image linkage; a later stage
//! failing never reverts an earlier one (accepted partial success), and no
//! error escapes the record boundary.

use sqlx::PgPool;

use atelier_core::{AppConfig, CandidateProduct, RecordOutcome, RecordStatus};
use atelier_db::{
    get_or_create_category, get_product_by_handle, get_product_by_name, insert_product,
    update_product,
};
use atelier_media::MediaClient;

use crate::images::process_candidate_images;
use crate::progress::ProgressSink;
use crate::variations::{reconcile_variations, PrunePolicy};

/// Processes one candidate end to end. Infallible by design: every failure
/// is recorded in the returned outcome.
pub async fn process_candidate(
    pool: &PgPool,
    media: &MediaClient,
    config: &AppConfig,
    sink: &dyn ProgressSink,
    candidate: &CandidateProduct,
) -> RecordOutcome {
    let mut category_id = None;
    let mut category_created = false;
    if let Some(category_name) = &candidate.category {
        match get_or_create_category(pool, category_name).await {
            Ok((row, created)) => {
                category_id = Some(row.id);
                category_created = created;
            }
            Err(e) => {
                return RecordOutcome::failed(
                    candidate.source_row,
                    &candidate.name,
                    format!("category \"{category_name}\" lookup failed: {e}"),
                );
            }
        }
    }

    // Handle is the identity when present; otherwise exact name match.
    let existing = match &candidate.handle {
        Some(handle) => get_product_by_handle(pool, handle).await,
        None => get_product_by_name(pool, &candidate.name).await,
    };
    let existing = match existing {
        Ok(row) => row,
        Err(e) => {
            return RecordOutcome::failed(
                candidate.source_row,
                &candidate.name,
                format!("product lookup failed: {e}"),
            );
        }
    };

    let (product_id, status) = match existing {
        Some(row) => match update_product(pool, row.id, candidate, category_id).await {
            Ok(()) => (row.id, RecordStatus::Updated),
            Err(e) => {
                return RecordOutcome::failed(
                    candidate.source_row,
                    &candidate.name,
                    format!("product update failed: {e}"),
                );
            }
        },
        None => match insert_product(pool, candidate, category_id).await {
            Ok(id) => (id, RecordStatus::Created),
            Err(e) => {
                return RecordOutcome::failed(
                    candidate.source_row,
                    &candidate.name,
                    format!("product insert failed: {e}"),
                );
            }
        },
    };

    let mut outcome = RecordOutcome {
        source_row: candidate.source_row,
        product_name: candidate.name.clone(),
        status,
        variations_created: 0,
        variations_updated: 0,
        variations_pruned: 0,
        images_processed: 0,
        images_uploaded: 0,
        images_failed: 0,
        category_created,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    // The product is committed; variation or image failures from here on
    // are recorded against the outcome without reverting it.
    match reconcile_variations(
        pool,
        product_id,
        candidate,
        config.default_stock_quantity,
        PrunePolicy::Automatic,
    )
    .await
    {
        Ok(reconciled) => {
            outcome.variations_created = reconciled.created;
            outcome.variations_updated = reconciled.updated;
            outcome.variations_pruned = reconciled.pruned;
            if reconciled.skipped_incomplete {
                outcome.warnings.push(
                    "only one option axis selected — product saved, variations skipped"
                        .to_string(),
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                product = %candidate.name,
                error = %e,
                "variation reconciliation failed; product write stands"
            );
            outcome
                .errors
                .push(format!("variation reconciliation failed: {e}"));
        }
    }

    let images = process_candidate_images(
        pool,
        media,
        product_id,
        candidate.source_row,
        &candidate.image_urls,
        sink,
    )
    .await;
    outcome.images_processed = images.processed;
    outcome.images_uploaded = images.uploaded;
    outcome.images_failed = images.failed;
    outcome.errors.extend(images.errors);

    outcome
}
