//! HTTP client for the remote asset host.
//!
//! The host ingests images by source URL: POST the original location, get
//! back the hosted copy's URL (or an `{"error": ...}` payload). Uploads are
//! retried a bounded number of times with a fixed delay; URLs already on
//! the host are returned unchanged without any request.

use std::time::Duration;

use serde::Deserialize;

use crate::error::MediaError;

/// Upload endpoint response: exactly one of the fields is set.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    error: Option<String>,
}

pub struct MediaClient {
    client: reqwest::Client,
    upload_url: String,
    /// Host name that marks a URL as already hosted, e.g. `media.example.com`.
    host: String,
    /// Additional attempts after the first failure.
    max_retries: u32,
    /// Fixed delay between attempts. Kept configurable so tests don't sleep.
    retry_delay_ms: u64,
}

impl MediaClient {
    /// Creates a `MediaClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure; set to `0` to disable retries. The delay between attempts is
    /// fixed at `retry_delay_ms` — the asset host throttles on concurrency,
    /// not frequency, so there is nothing to gain from backing off further.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        upload_url: &str,
        host: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            upload_url: upload_url.to_string(),
            host: host.to_string(),
            max_retries,
            retry_delay_ms,
        })
    }

    /// Returns `true` when `url` already points at the asset host.
    #[must_use]
    pub fn is_hosted(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| h == self.host))
            .unwrap_or(false)
    }

    /// Uploads the image behind `source_url` to the asset host and returns
    /// the hosted URL.
    ///
    /// A URL already on the host is returned byte-identical without any
    /// request. Failed attempts are retried up to `max_retries` more times
    /// with the fixed delay; the host gives no signal to distinguish
    /// transient from permanent failures, so every failure is retried
    /// within that budget.
    ///
    /// # Errors
    ///
    /// - [`MediaError::Rejected`] — the host answered with an error payload.
    /// - [`MediaError::UnexpectedStatus`] — non-2xx response.
    /// - [`MediaError::MalformedResponse`] — 2xx with neither url nor error.
    /// - [`MediaError::Http`] — network failure after all retries.
    pub async fn upload_source_url(&self, source_url: &str) -> Result<String, MediaError> {
        if self.is_hosted(source_url) {
            return Ok(source_url.to_string());
        }

        let mut attempt = 0u32;
        loop {
            match self.try_upload(source_url).await {
                Ok(hosted) => return Ok(hosted),
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        source_url,
                        error = %err,
                        "image upload failed — retrying after delay"
                    );
                    tokio::time::sleep(Duration::from_millis(self.retry_delay_ms)).await;
                }
            }
        }
    }

    async fn try_upload(&self, source_url: &str) -> Result<String, MediaError> {
        let response = self
            .client
            .post(&self.upload_url)
            .json(&serde_json::json!({ "url": source_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.upload_url.clone(),
            });
        }

        let body: UploadResponse = response.json().await?;
        if let Some(message) = body.error {
            return Err(MediaError::Rejected {
                source_url: source_url.to_string(),
                message,
            });
        }
        body.url.ok_or_else(|| MediaError::MalformedResponse {
            source_url: source_url.to_string(),
        })
    }

    /// Best-effort remote deletion of a hosted asset. One attempt, no
    /// retries: the database row is already gone when this runs, and the
    /// caller only logs a failure.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::UnexpectedStatus`] on a non-2xx response or
    /// [`MediaError::Http`] on a network failure.
    pub async fn delete_asset(&self, hosted_url: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(&self.upload_url)
            .json(&serde_json::json!({ "url": hosted_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.upload_url.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(host: &str) -> MediaClient {
        MediaClient::new(
            "https://media.example.com/api/upload",
            host,
            5,
            "atelier-test/0.1",
            0,
            0,
        )
        .expect("failed to build test MediaClient")
    }

    #[test]
    fn is_hosted_matches_exact_host() {
        let client = test_client("media.example.com");
        assert!(client.is_hosted("https://media.example.com/images/a.jpg"));
        assert!(!client.is_hosted("https://cdn.shopify.com/images/a.jpg"));
    }

    #[test]
    fn is_hosted_does_not_match_substring_hosts() {
        let client = test_client("media.example.com");
        assert!(!client.is_hosted("https://media.example.com.evil.net/a.jpg"));
        assert!(!client.is_hosted("https://submedia.example.com/a.jpg"));
    }

    #[test]
    fn is_hosted_rejects_unparseable_urls() {
        let client = test_client("media.example.com");
        assert!(!client.is_hosted("not a url"));
        assert!(!client.is_hosted(""));
    }
}
