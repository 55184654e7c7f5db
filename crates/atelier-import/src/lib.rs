pub mod error;
pub mod images;
pub mod pipeline;
pub mod progress;
pub mod sku;
pub mod upsert;
pub mod variations;

pub use error::ImportError;
pub use images::delete_image;
pub use pipeline::run_import;
pub use progress::{ProgressEvent, ProgressSink, TracingSink};
pub use sku::generate_unique_sku;
pub use variations::{prune_variations, PrunePolicy};
