use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product candidate produced by the field mapper, normalized for the
/// import pipeline regardless of which CSV shape it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProduct {
    /// 1-based data-row number in the source file, for error reporting.
    /// For a Shopify handle-group this is the group's main row.
    pub source_row: usize,
    /// Shopify URL slug, e.g. `"acrylic-painting"`. The import's
    /// deduplication identity when present; `None` for flat-template rows.
    pub handle: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Base product price after currency-symbol and separator stripping.
    /// Defaults to zero when the source value was missing or unparseable.
    pub price: Decimal,
    pub category: Option<String>,
    /// Referenced image URLs in file order, main image first. May point at
    /// arbitrary hosts; the media pipeline decides what needs uploading.
    pub image_urls: Vec<String>,
    pub is_featured: bool,
    /// Size option values in first-seen order, e.g. `["Small", "Large"]`.
    /// Empty together with `frame_names` means the product gets the single
    /// synthetic default variation.
    pub size_names: Vec<String>,
    /// Frame option values in first-seen order.
    pub frame_names: Vec<String>,
    /// Explicit inventory quantity, when the source carried one.
    pub stock_quantity: Option<i32>,
}

impl CandidateProduct {
    /// Returns `true` when neither option axis carries any values, i.e. the
    /// product receives the synthetic Default Size × Default Frame pair.
    #[must_use]
    pub fn has_no_options(&self) -> bool {
        self.size_names.is_empty() && self.frame_names.is_empty()
    }

    /// Returns `true` when exactly one option axis is populated. Such
    /// candidates save the product but skip variation generation with a
    /// warning.
    #[must_use]
    pub fn has_incomplete_options(&self) -> bool {
        self.size_names.is_empty() != self.frame_names.is_empty()
    }

    /// The number of size × frame combinations the variation generator will
    /// aim for. Zero for incomplete option selections.
    #[must_use]
    pub fn desired_variation_count(&self) -> usize {
        if self.has_no_options() {
            1
        } else if self.has_incomplete_options() {
            0
        } else {
            self.size_names.len() * self.frame_names.len()
        }
    }
}

/// The full mapped batch: surviving candidates plus the rows that were
/// dropped during normalization, with per-row reasons for the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecords {
    pub candidates: Vec<CandidateProduct>,
    /// `(1-based source row, reason)` for rows excluded from the batch.
    pub dropped: Vec<(usize, String)>,
    /// Non-fatal normalization notes, e.g. a missing price defaulted to 0.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candidate(sizes: &[&str], frames: &[&str]) -> CandidateProduct {
        CandidateProduct {
            source_row: 1,
            handle: None,
            name: "Acrylic Painting".to_string(),
            description: Some("desc".to_string()),
            price: "199.99".parse().unwrap(),
            category: Some("Paintings".to_string()),
            image_urls: vec!["http://x/img.jpg".to_string()],
            is_featured: true,
            size_names: sizes.iter().map(ToString::to_string).collect(),
            frame_names: frames.iter().map(ToString::to_string).collect(),
            stock_quantity: Some(10),
        }
    }

    #[test]
    fn no_options_yields_single_default_combination() {
        let candidate = make_candidate(&[], &[]);
        assert!(candidate.has_no_options());
        assert!(!candidate.has_incomplete_options());
        assert_eq!(candidate.desired_variation_count(), 1);
    }

    #[test]
    fn only_sizes_is_incomplete() {
        let candidate = make_candidate(&["Small", "Large"], &[]);
        assert!(candidate.has_incomplete_options());
        assert_eq!(candidate.desired_variation_count(), 0);
    }

    #[test]
    fn only_frames_is_incomplete() {
        let candidate = make_candidate(&[], &["Black Wood"]);
        assert!(candidate.has_incomplete_options());
        assert_eq!(candidate.desired_variation_count(), 0);
    }

    #[test]
    fn both_axes_multiply() {
        let candidate = make_candidate(&["Small", "Medium", "Large"], &["Black", "Natural"]);
        assert!(!candidate.has_incomplete_options());
        assert_eq!(candidate.desired_variation_count(), 6);
    }

    #[test]
    fn serde_roundtrip_candidate() {
        let candidate = make_candidate(&["Small"], &["Black"]);
        let json = serde_json::to_string(&candidate).expect("serialization failed");
        let decoded: CandidateProduct = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded.name, candidate.name);
        assert_eq!(decoded.price, candidate.price);
        assert_eq!(decoded.size_names, candidate.size_names);
    }
}
