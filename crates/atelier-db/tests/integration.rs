//! Offline unit tests for atelier-db pool configuration and row types.
//! These tests do not require a live database connection.

use atelier_core::AppConfig;
use atelier_db::{PoolConfig, ProductRow, VariationRow};

fn make_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        log_level: "info".to_string(),
        media_upload_url: "https://media.example.com/api/upload".to_string(),
        media_host: "media.example.com".to_string(),
        media_user_agent: "atelier-test/0.1".to_string(),
        request_timeout_secs: 30,
        image_max_retries: 3,
        image_retry_delay_ms: 1000,
        batch_size: 10,
        default_stock_quantity: 10,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&make_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm the row types carry the expected fields
/// with the expected types. No database required.
#[test]
fn product_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = ProductRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        name: "Acrylic Painting".to_string(),
        description: Some("desc".to_string()),
        price: "199.99".parse().unwrap(),
        category_id: None,
        image_url: Some("https://media.example.com/a.jpg".to_string()),
        is_featured: true,
        is_active: true,
        handle: Some("acrylic-painting".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.name, "Acrylic Painting");
    assert_eq!(row.handle.as_deref(), Some("acrylic-painting"));
}

#[test]
fn variation_row_has_expected_fields() {
    use chrono::Utc;

    let row = VariationRow {
        id: 5_i64,
        product_id: 1_i64,
        size_id: 2_i64,
        frame_type_id: 3_i64,
        sku: "acrylicp-small-black".to_string(),
        price: "110".parse().unwrap(),
        stock_quantity: 10,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.sku, "acrylicp-small-black");
    assert_eq!(row.stock_quantity, 10);
}
