#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// Upload endpoint of the remote asset host, e.g.
    /// `https://media.example.com/api/upload`.
    pub media_upload_url: String,
    /// Host name that marks an image URL as already hosted, e.g.
    /// `media.example.com`. Such URLs are never re-uploaded.
    pub media_host: String,
    pub media_user_agent: String,
    pub request_timeout_secs: u64,
    /// Additional upload attempts after the first failure.
    pub image_max_retries: u32,
    /// Fixed delay between upload attempts. Configurable so tests don't sleep.
    pub image_retry_delay_ms: u64,
    /// Records per pipeline batch; batches run sequentially, records within
    /// a batch concurrently.
    pub batch_size: usize,
    /// Stock quantity for generated variations when the source file carries
    /// no inventory column.
    pub default_stock_quantity: i32,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("media_upload_url", &self.media_upload_url)
            .field("media_host", &self.media_host)
            .field("media_user_agent", &self.media_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("image_max_retries", &self.image_max_retries)
            .field("image_retry_delay_ms", &self.image_retry_delay_ms)
            .field("batch_size", &self.batch_size)
            .field("default_stock_quantity", &self.default_stock_quantity)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
