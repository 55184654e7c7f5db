//! Format detection over the header row.
//!
//! Detection is a pure function into a closed tagged set; all column-name
//! knowledge lives here and in [`crate::mapper`]'s static tables, not in
//! inline conditionals scattered through the pipeline.

use serde::{Deserialize, Serialize};

/// The recognized CSV shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    /// Flat one-row-per-product template: `name, description, price, ...`.
    Standard,
    /// Shopify's multi-row-per-product variant export, grouped by `Handle`.
    Shopify,
    /// Unrecognized column set; the operator must map columns manually.
    Unknown,
}

impl ImportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ImportFormat::Standard => "standard",
            ImportFormat::Shopify => "shopify",
            ImportFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects the file format from its header names.
///
/// `Handle` plus either `Title` or `Variant Price` marks a Shopify export;
/// the presence of `name`, `price`, and `description` marks the flat
/// template; anything else is `Unknown`.
#[must_use]
pub fn detect_format(headers: &[String]) -> ImportFormat {
    let has = |name: &str| headers.iter().any(|h| h == name);

    if has("Handle") && (has("Title") || has("Variant Price")) {
        return ImportFormat::Shopify;
    }
    if has("name") && has("price") && has("description") {
        return ImportFormat::Standard;
    }
    ImportFormat::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn detects_shopify_with_title() {
        let h = headers(&["Handle", "Title", "Body (HTML)", "Type"]);
        assert_eq!(detect_format(&h), ImportFormat::Shopify);
    }

    #[test]
    fn detects_shopify_with_variant_price_only() {
        let h = headers(&["Handle", "Variant Price", "Variant SKU"]);
        assert_eq!(detect_format(&h), ImportFormat::Shopify);
    }

    #[test]
    fn handle_alone_is_not_shopify() {
        let h = headers(&["Handle", "Something Else"]);
        assert_eq!(detect_format(&h), ImportFormat::Unknown);
    }

    #[test]
    fn detects_standard() {
        let h = headers(&[
            "name",
            "description",
            "price",
            "stock_quantity",
            "category",
            "image_url",
            "is_featured",
        ]);
        assert_eq!(detect_format(&h), ImportFormat::Standard);
    }

    #[test]
    fn standard_requires_all_three_markers() {
        let h = headers(&["name", "price"]);
        assert_eq!(detect_format(&h), ImportFormat::Unknown);
    }

    #[test]
    fn shopify_wins_over_standard_when_both_match() {
        // A file carrying both marker sets is grouped by Handle.
        let h = headers(&["Handle", "Title", "name", "price", "description"]);
        assert_eq!(detect_format(&h), ImportFormat::Shopify);
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let h = headers(&["handle", "title"]);
        assert_eq!(detect_format(&h), ImportFormat::Unknown);
    }

    #[test]
    fn empty_headers_are_unknown() {
        assert_eq!(detect_format(&[]), ImportFormat::Unknown);
    }
}
