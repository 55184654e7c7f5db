pub mod client;
pub mod error;

pub use client::MediaClient;
pub use error::MediaError;
