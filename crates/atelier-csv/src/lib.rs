pub mod detect;
pub mod error;
pub mod mapper;
pub mod normalize;
pub mod reader;
pub mod shopify;

pub use detect::{detect_format, ImportFormat};
pub use error::CsvImportError;
pub use mapper::{DestinationField, FieldMapping};
pub use normalize::{normalize_shopify_groups, normalize_standard_rows};
pub use reader::{read_csv, ParsedCsv, RawRow};
pub use shopify::{group_by_handle, HandleGroup};
