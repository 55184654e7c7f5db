//! Integration tests for `MediaClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path, the hosted-URL no-op,
//! the bounded retry budget, and the error payload shape.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier_media::{MediaClient, MediaError};

/// Builds a `MediaClient` pointed at the mock server, with no retries and
/// no delay unless a test says otherwise.
fn test_client(server: &MockServer, host: &str, max_retries: u32) -> MediaClient {
    MediaClient::new(
        &format!("{}/api/upload", server.uri()),
        host,
        5,
        "atelier-test/0.1",
        max_retries,
        0,
    )
    .expect("failed to build test MediaClient")
}

// ---------------------------------------------------------------------------
// Upload happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_hosted_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_partial_json(json!({"url": "http://shop.example.com/a.jpg"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://media.example.com/hosted/a.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 0);
    let hosted = client
        .upload_source_url("http://shop.example.com/a.jpg")
        .await
        .expect("upload should succeed");
    assert_eq!(hosted, "https://media.example.com/hosted/a.jpg");
}

// ---------------------------------------------------------------------------
// Hosted-URL no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn already_hosted_url_is_never_uploaded() {
    let server = MockServer::start().await;

    // Zero requests allowed: the hosted URL must short-circuit.
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 3);
    let url = "https://media.example.com/hosted/a.jpg";
    let result = client
        .upload_source_url(url)
        .await
        .expect("no-op should succeed");
    assert_eq!(result, url, "hosted URLs come back byte-identical");
}

// ---------------------------------------------------------------------------
// Retry budget
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_retries_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://media.example.com/hosted/b.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 3);
    let hosted = client
        .upload_source_url("http://shop.example.com/b.jpg")
        .await
        .expect("upload should succeed on third attempt");
    assert_eq!(hosted, "https://media.example.com/hosted/b.jpg");
}

#[tokio::test]
async fn upload_gives_up_after_retry_budget() {
    let server = MockServer::start().await;

    // First attempt + 3 retries = 4 requests, then the error surfaces.
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 3);
    let err = client
        .upload_source_url("http://shop.example.com/c.jpg")
        .await
        .unwrap_err();
    assert!(
        matches!(err, MediaError::UnexpectedStatus { status: 502, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 0);
    let result = client.upload_source_url("http://shop.example.com/d.jpg").await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Error payloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_payload_becomes_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "unsupported format"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 0);
    let err = client
        .upload_source_url("http://shop.example.com/e.bmp")
        .await
        .unwrap_err();
    assert!(
        matches!(err, MediaError::Rejected { ref message, .. } if message == "unsupported format"),
        "expected Rejected, got: {err:?}"
    );
}

#[tokio::test]
async fn empty_success_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 0);
    let err = client
        .upload_source_url("http://shop.example.com/f.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::MalformedResponse { .. }));
}

// ---------------------------------------------------------------------------
// Remote deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_asset_sends_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/upload"))
        .and(body_partial_json(
            json!({"url": "https://media.example.com/hosted/a.jpg"}),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 3);
    client
        .delete_asset("https://media.example.com/hosted/a.jpg")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn delete_asset_failure_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, "media.example.com", 3);
    let err = client
        .delete_asset("https://media.example.com/hosted/gone.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::UnexpectedStatus { status: 404, .. }));
}
