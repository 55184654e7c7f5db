//! Variation reconciliation: drive a product's stored variations to the
//! desired size × frame combination set.
//!
//! Desired combinations come from the candidate's option axes (or the
//! synthetic default pair); missing ones are created with a generated SKU,
//! kept ones get price/stock refreshed, and stored variations outside the
//! set are pruned — immediately on the batch path, deferred behind operator
//! confirmation on the interactive editor path.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sqlx::PgPool;

use atelier_core::CandidateProduct;
use atelier_db::{
    delete_variations, get_or_create_frame_type, get_or_create_size, insert_variation,
    list_variations, sku_exists, update_variation, DbError, FrameTypeRow, SizeRow,
};

use crate::sku::generate_unique_sku;

/// Names of the synthetic pair used when a candidate has no option axes.
pub const DEFAULT_SIZE_NAME: &str = "Default Size";
pub const DEFAULT_FRAME_NAME: &str = "Default Frame";

/// Desired combinations for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombinationPlan {
    /// `(size name, frame name)` pairs, sizes outermost, in option order.
    Pairs(Vec<(String, String)>),
    /// Exactly one axis was populated: save the product, skip variations,
    /// warn the operator.
    Incomplete,
}

/// Computes the desired size × frame set for a candidate.
#[must_use]
pub fn plan_combinations(candidate: &CandidateProduct) -> CombinationPlan {
    if candidate.has_no_options() {
        return CombinationPlan::Pairs(vec![(
            DEFAULT_SIZE_NAME.to_string(),
            DEFAULT_FRAME_NAME.to_string(),
        )]);
    }
    if candidate.has_incomplete_options() {
        return CombinationPlan::Incomplete;
    }
    let pairs = candidate
        .size_names
        .iter()
        .flat_map(|size| {
            candidate
                .frame_names
                .iter()
                .map(move |frame| (size.clone(), frame.clone()))
        })
        .collect();
    CombinationPlan::Pairs(pairs)
}

/// Price of a variation: base price plus the size and frame adjustments.
#[must_use]
pub fn variation_price(base: Decimal, size_adjustment: Decimal, frame_adjustment: Decimal) -> Decimal {
    base + size_adjustment + frame_adjustment
}

/// How to handle stored variations that fall outside the desired set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunePolicy {
    /// Delete immediately — the batch CSV import path. No prompt.
    Automatic,
    /// Return them as [`PendingPrune`]s for the interactive editor to
    /// confirm before calling [`prune_variations`].
    Deferred,
}

/// A stored variation awaiting operator confirmation before deletion.
#[derive(Debug, Clone)]
pub struct PendingPrune {
    pub variation_id: i64,
    pub sku: String,
}

/// Result of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub created: u32,
    pub updated: u32,
    pub pruned: u32,
    /// Set when the candidate had exactly one option axis and variations
    /// were skipped.
    pub skipped_incomplete: bool,
    /// Only populated under [`PrunePolicy::Deferred`].
    pub pending_prunes: Vec<PendingPrune>,
}

/// Reconciles a product's stored variations with the candidate's desired
/// size × frame set.
///
/// # Errors
///
/// Returns [`DbError`] on the first storage failure; whatever was already
/// created or updated stays committed (no rollback — the caller records the
/// error against the record and moves on).
pub async fn reconcile_variations(
    pool: &PgPool,
    product_id: i64,
    candidate: &CandidateProduct,
    default_stock: i32,
    policy: PrunePolicy,
) -> Result<ReconcileOutcome, DbError> {
    let mut outcome = ReconcileOutcome::default();

    let pairs = match plan_combinations(candidate) {
        CombinationPlan::Incomplete => {
            outcome.skipped_incomplete = true;
            return Ok(outcome);
        }
        CombinationPlan::Pairs(pairs) => pairs,
    };

    // Resolve each distinct option name once; repeated pairs share rows.
    let mut sizes: HashMap<String, SizeRow> = HashMap::new();
    let mut frames: HashMap<String, FrameTypeRow> = HashMap::new();
    for (size_name, frame_name) in &pairs {
        if !sizes.contains_key(size_name) {
            let (row, _) = get_or_create_size(pool, size_name).await?;
            sizes.insert(size_name.clone(), row);
        }
        if !frames.contains_key(frame_name) {
            let (row, _) = get_or_create_frame_type(pool, frame_name).await?;
            frames.insert(frame_name.clone(), row);
        }
    }

    let existing = list_variations(pool, product_id).await?;
    let existing_by_pair: HashMap<(i64, i64), &atelier_db::VariationRow> = existing
        .iter()
        .map(|row| ((row.size_id, row.frame_type_id), row))
        .collect();

    let stock = candidate.stock_quantity.unwrap_or(default_stock);
    let mut desired_ids: HashSet<(i64, i64)> = HashSet::new();

    for (size_name, frame_name) in &pairs {
        let size = &sizes[size_name];
        let frame = &frames[frame_name];
        if !desired_ids.insert((size.id, frame.id)) {
            continue;
        }

        let price = variation_price(candidate.price, size.price_adjustment, frame.price_adjustment);
        if let Some(row) = existing_by_pair.get(&(size.id, frame.id)) {
            update_variation(pool, row.id, price, stock).await?;
            outcome.updated += 1;
        } else {
            let sku =
                generate_unique_sku(&candidate.name, &size.code, &frame.name, |candidate_sku| {
                    async move { sku_exists(pool, &candidate_sku).await }
                })
                .await?;
            insert_variation(pool, product_id, size.id, frame.id, &sku, price, stock).await?;
            outcome.created += 1;
        }
    }

    let extras: Vec<&atelier_db::VariationRow> = existing
        .iter()
        .filter(|row| !desired_ids.contains(&(row.size_id, row.frame_type_id)))
        .collect();

    if !extras.is_empty() {
        match policy {
            PrunePolicy::Automatic => {
                let ids: Vec<i64> = extras.iter().map(|row| row.id).collect();
                let deleted = delete_variations(pool, &ids).await?;
                outcome.pruned = u32::try_from(deleted).unwrap_or(u32::MAX);
                tracing::info!(
                    product_id,
                    pruned = outcome.pruned,
                    "pruned variations outside the desired combination set"
                );
            }
            PrunePolicy::Deferred => {
                outcome.pending_prunes = extras
                    .iter()
                    .map(|row| PendingPrune {
                        variation_id: row.id,
                        sku: row.sku.clone(),
                    })
                    .collect();
            }
        }
    }

    Ok(outcome)
}

/// Deletes previously deferred prunes after operator confirmation.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub async fn prune_variations(pool: &PgPool, pending: &[PendingPrune]) -> Result<u64, DbError> {
    let ids: Vec<i64> = pending.iter().map(|p| p.variation_id).collect();
    delete_variations(pool, &ids).await
}
