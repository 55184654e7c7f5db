pub mod app_config;
pub mod config;
pub mod records;
pub mod stats;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use records::{CandidateProduct, CandidateRecords};
pub use stats::{progress_percent, ImportStats, RecordOutcome, RecordStatus};
