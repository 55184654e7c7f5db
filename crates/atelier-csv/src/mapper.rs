//! Source-column → destination-field mapping.
//!
//! The mapping is a session-scoped value the operator can edit before
//! committing a run; it is never persisted. Best-guess defaults for the
//! recognized formats live in static tables here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detect::ImportFormat;
use crate::reader::RawRow;

/// The fixed set of destination fields a source column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationField {
    Name,
    Description,
    Price,
    Category,
    ImageUrl,
    Featured,
}

impl DestinationField {
    /// Every destination field, in operator-display order.
    pub const ALL: [DestinationField; 6] = [
        DestinationField::Name,
        DestinationField::Description,
        DestinationField::Price,
        DestinationField::Category,
        DestinationField::ImageUrl,
        DestinationField::Featured,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DestinationField::Name => "name",
            DestinationField::Description => "description",
            DestinationField::Price => "price",
            DestinationField::Category => "category",
            DestinationField::ImageUrl => "image_url",
            DestinationField::Featured => "featured",
        }
    }

    /// Parses an operator-supplied field name (`--map SRC=DEST`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for DestinationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default mapping for the flat template.
const STANDARD_MAPPING: &[(&str, DestinationField)] = &[
    ("name", DestinationField::Name),
    ("description", DestinationField::Description),
    ("price", DestinationField::Price),
    ("category", DestinationField::Category),
    ("image_url", DestinationField::ImageUrl),
    ("is_featured", DestinationField::Featured),
];

/// Default mapping for Shopify exports. `Published` feeds the featured flag;
/// operators routinely remap it.
const SHOPIFY_MAPPING: &[(&str, DestinationField)] = &[
    ("Title", DestinationField::Name),
    ("Body (HTML)", DestinationField::Description),
    ("Variant Price", DestinationField::Price),
    ("Type", DestinationField::Category),
    ("Image Src", DestinationField::ImageUrl),
    ("Published", DestinationField::Featured),
];

/// An editable, ordered list of `(source column, destination field)` pairs.
///
/// At most one source column per destination field: setting a destination
/// that is already mapped replaces the previous source column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMapping {
    pairs: Vec<(String, DestinationField)>,
}

impl FieldMapping {
    /// Best-guess mapping for a detected format. `Unknown` starts empty and
    /// the operator builds the mapping by hand.
    #[must_use]
    pub fn for_format(format: ImportFormat) -> Self {
        let table = match format {
            ImportFormat::Standard => STANDARD_MAPPING,
            ImportFormat::Shopify => SHOPIFY_MAPPING,
            ImportFormat::Unknown => &[],
        };
        Self {
            pairs: table
                .iter()
                .map(|(source, dest)| ((*source).to_string(), *dest))
                .collect(),
        }
    }

    /// Maps `source` onto `dest`, replacing any existing pair for the same
    /// destination field.
    pub fn set(&mut self, source: &str, dest: DestinationField) {
        self.pairs.retain(|(_, d)| *d != dest);
        self.pairs.push((source.to_string(), dest));
    }

    /// Removes the pair for `dest`, if any. Returns `true` when a pair was
    /// removed.
    pub fn remove(&mut self, dest: DestinationField) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(_, d)| *d != dest);
        self.pairs.len() != before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs in insertion order, for operator display.
    #[must_use]
    pub fn pairs(&self) -> &[(String, DestinationField)] {
        &self.pairs
    }

    /// The source column currently mapped onto `dest`.
    #[must_use]
    pub fn source_for(&self, dest: DestinationField) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, d)| *d == dest)
            .map(|(source, _)| source.as_str())
    }

    /// Applies the mapping to one raw row: every active pair copies the raw
    /// value under its destination field; unmapped source columns are
    /// dropped. Blank source values yield no entry.
    #[must_use]
    pub fn apply(&self, row: &RawRow) -> HashMap<DestinationField, String> {
        self.pairs
            .iter()
            .filter_map(|(source, dest)| {
                row.get(source).map(|value| (*dest, value.to_string()))
            })
            .collect()
    }
}
