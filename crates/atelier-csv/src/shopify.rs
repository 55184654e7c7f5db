//! Handle-grouping for Shopify exports.
//!
//! Shopify writes one row per variant; rows sharing a `Handle` are one
//! logical product. The first row of a group carrying a non-empty `Title`
//! is the main row (the canonical representation of the product); every
//! other row in the group becomes a variation row.

use crate::reader::RawRow;

/// One logical product assembled from a Shopify handle-group.
#[derive(Debug, Clone)]
pub struct HandleGroup {
    pub handle: String,
    /// The canonical row: first in the group with a non-empty `Title`,
    /// falling back to the group's first row when none has one.
    pub main: RawRow,
    /// The remaining rows of the group, in file order.
    pub variation_rows: Vec<RawRow>,
}

impl HandleGroup {
    /// All rows of the group (main row included), restored to file order.
    /// Option values and per-row images are collected across the whole group.
    #[must_use]
    pub fn all_rows(&self) -> Vec<&RawRow> {
        let mut rows: Vec<&RawRow> = std::iter::once(&self.main)
            .chain(self.variation_rows.iter())
            .collect();
        rows.sort_by_key(|row| row.index);
        rows
    }
}

/// Groups rows by their `Handle` column, preserving first-seen group order
/// and file order within each group. Rows without a `Handle` value are
/// skipped (Shopify never emits them; a hand-edited file might).
#[must_use]
pub fn group_by_handle(rows: Vec<RawRow>) -> Vec<HandleGroup> {
    // (handle, rows) pairs in first-seen order. Files group a product's rows
    // contiguously but nothing here depends on that.
    let mut grouped: Vec<(String, Vec<RawRow>)> = Vec::new();

    for row in rows {
        let Some(handle) = row.get("Handle").map(ToString::to_string) else {
            tracing::warn!(row = row.index, "skipping row with empty Handle");
            continue;
        };
        match grouped.iter_mut().find(|(h, _)| *h == handle) {
            Some((_, group_rows)) => group_rows.push(row),
            None => grouped.push((handle, vec![row])),
        }
    }

    grouped
        .into_iter()
        .map(|(handle, mut group_rows)| {
            let main_pos = group_rows
                .iter()
                .position(|row| row.get("Title").is_some())
                .unwrap_or(0);
            let main = group_rows.remove(main_pos);
            HandleGroup {
                handle,
                main,
                variation_rows: group_rows,
            }
        })
        .collect()
}
