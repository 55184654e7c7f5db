//! Normalization from mapped CSV rows to [`atelier_core::CandidateProduct`].
//!
//! Row-shape concerns (grouping, mapping) are handled before this module;
//! here the mapped values are cleaned up, defaulted, and assembled into
//! candidates, with per-row drop reasons and warnings recorded for the run
//! summary.

use std::collections::HashMap;

use rust_decimal::Decimal;

use atelier_core::{CandidateProduct, CandidateRecords};

use crate::error::CsvImportError;
use crate::mapper::{DestinationField, FieldMapping};
use crate::reader::RawRow;
use crate::shopify::HandleGroup;

/// Source columns consulted directly, outside the operator-editable mapping.
/// `Handle` doubles as the fallback product name; the inventory columns feed
/// variation stock quantities.
const STANDARD_STOCK_COLUMN: &str = "stock_quantity";
const SHOPIFY_STOCK_COLUMN: &str = "Variant Inventory Qty";

/// Strips currency symbols and thousands separators, then parses a decimal.
///
/// `"$1,299.50"` parses to `1299.50`. Returns `None` when nothing numeric
/// remains.
#[must_use]
pub fn sanitize_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Boolean normalization for flag-like values: `"true"`, `"TRUE"`, and
/// `"1"` are truthy, everything else is falsy.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "TRUE" | "1")
}

/// Builds candidates from flat-template rows: one candidate per row, no
/// option axes (each product gets the synthetic default variation).
///
/// # Errors
///
/// Returns [`CsvImportError::NoValidRecords`] when every row was dropped.
pub fn normalize_standard_rows(
    rows: &[RawRow],
    mapping: &FieldMapping,
) -> Result<CandidateRecords, CsvImportError> {
    let mut records = CandidateRecords {
        candidates: Vec::new(),
        dropped: Vec::new(),
        warnings: Vec::new(),
    };

    for row in rows {
        let mapped = mapping.apply(row);
        let Some(name) = resolve_name(&mapped, row) else {
            records
                .dropped
                .push((row.index, "no product name after mapping".to_string()));
            continue;
        };

        let price = resolve_price(&mapped, row.index, &name, &mut records.warnings);
        let stock_quantity = parse_stock(row.get(STANDARD_STOCK_COLUMN));

        records.candidates.push(CandidateProduct {
            source_row: row.index,
            handle: None,
            name,
            description: mapped.get(&DestinationField::Description).cloned(),
            price,
            category: mapped.get(&DestinationField::Category).cloned(),
            image_urls: mapped
                .get(&DestinationField::ImageUrl)
                .cloned()
                .into_iter()
                .collect(),
            is_featured: mapped
                .get(&DestinationField::Featured)
                .is_some_and(|v| parse_flag(v)),
            size_names: Vec::new(),
            frame_names: Vec::new(),
            stock_quantity,
        });
    }

    finish(records)
}

/// Builds candidates from Shopify handle-groups: one candidate per group,
/// core fields from the main row, option values and per-row images
/// collected across the whole group.
///
/// # Errors
///
/// Returns [`CsvImportError::NoValidRecords`] when every group was dropped.
pub fn normalize_shopify_groups(
    groups: &[HandleGroup],
    mapping: &FieldMapping,
) -> Result<CandidateRecords, CsvImportError> {
    let mut records = CandidateRecords {
        candidates: Vec::new(),
        dropped: Vec::new(),
        warnings: Vec::new(),
    };

    for group in groups {
        let mapped = mapping.apply(&group.main);
        // The Handle is the fallback name; a group can't lack one.
        let name = resolve_name(&mapped, &group.main).unwrap_or_else(|| group.handle.clone());

        let price = resolve_price(&mapped, group.main.index, &name, &mut records.warnings);

        let (size_names, frame_names) = collect_option_axes(group);

        let mut image_urls: Vec<String> = Vec::new();
        if let Some(main_image) = mapped.get(&DestinationField::ImageUrl) {
            image_urls.push(main_image.clone());
        }
        for row in group.all_rows() {
            if let Some(src) = row.get("Image Src") {
                if !image_urls.iter().any(|u| u == src) {
                    image_urls.push(src.to_string());
                }
            }
        }

        let stock_quantity = group
            .all_rows()
            .iter()
            .find_map(|row| parse_stock(row.get(SHOPIFY_STOCK_COLUMN)));

        records.candidates.push(CandidateProduct {
            source_row: group.main.index,
            handle: Some(group.handle.clone()),
            name,
            description: mapped.get(&DestinationField::Description).cloned(),
            price,
            category: mapped.get(&DestinationField::Category).cloned(),
            image_urls,
            is_featured: mapped
                .get(&DestinationField::Featured)
                .is_some_and(|v| parse_flag(v)),
            size_names,
            frame_names,
            stock_quantity,
        });
    }

    finish(records)
}

fn finish(records: CandidateRecords) -> Result<CandidateRecords, CsvImportError> {
    if records.candidates.is_empty() {
        return Err(CsvImportError::NoValidRecords {
            dropped: records.dropped.len(),
        });
    }
    Ok(records)
}

/// The mapped name, falling back to the row's verbatim `Handle`.
fn resolve_name(
    mapped: &HashMap<DestinationField, String>,
    row: &RawRow,
) -> Option<String> {
    mapped
        .get(&DestinationField::Name)
        .cloned()
        .or_else(|| row.get("Handle").map(ToString::to_string))
}

/// The mapped price, defaulting to zero with a recorded warning when the
/// value is missing or unparseable (a warning, not a drop).
fn resolve_price(
    mapped: &HashMap<DestinationField, String>,
    row_index: usize,
    name: &str,
    warnings: &mut Vec<String>,
) -> Decimal {
    match mapped.get(&DestinationField::Price) {
        Some(raw) => sanitize_price(raw).unwrap_or_else(|| {
            warnings.push(format!(
                "row {row_index}: unparseable price \"{raw}\" for \"{name}\" — defaulting to 0"
            ));
            Decimal::ZERO
        }),
        None => {
            warnings.push(format!(
                "row {row_index}: no price for \"{name}\" — defaulting to 0"
            ));
            Decimal::ZERO
        }
    }
}

fn parse_stock(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|v| v.parse::<i32>().ok())
}

/// Collects size and frame option values across a handle-group.
///
/// Shopify names each option axis once (on the first row of the group) and
/// repeats only the values on later rows. An axis whose name contains
/// `size` feeds sizes and one containing `frame` feeds frames; otherwise
/// Option1 feeds sizes and Option2 frames. Shopify's `Title` placeholder
/// axis (single-variant products) carries no real options and is ignored.
fn collect_option_axes(group: &HandleGroup) -> (Vec<String>, Vec<String>) {
    let mut size_names: Vec<String> = Vec::new();
    let mut frame_names: Vec<String> = Vec::new();

    for option_index in 1..=2u8 {
        let name_column = format!("Option{option_index} Name");
        let value_column = format!("Option{option_index} Value");

        let axis_name = group
            .all_rows()
            .iter()
            .find_map(|row| row.get(&name_column))
            .map(str::to_lowercase);

        let target = match axis_name.as_deref() {
            None | Some("title") => continue,
            Some(name) if name.contains("size") => &mut size_names,
            Some(name) if name.contains("frame") => &mut frame_names,
            Some(_) if option_index == 1 => &mut size_names,
            Some(_) => &mut frame_names,
        };

        for row in group.all_rows() {
            if let Some(value) = row.get(&value_column) {
                if !target.iter().any(|v| v == value) {
                    target.push(value.to_string());
                }
            }
        }
    }

    (size_names, frame_names)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
