//! Offline unit tests for talentgeo-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use rust_decimal::Decimal;
use talentgeo_core::{AppConfig, Environment};
use talentgeo_db::{CandidateRow, NewCandidate, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        regions_path: PathBuf::from("./config/zip_regions.yaml"),
        geocode_cache_path: PathBuf::from("./data/geocode_cache.json"),
        geocoder_base_url: "https://api.zippopotam.us".to_string(),
        geocoder_timeout_secs: 5,
        geocoder_batch_delay_ms: 100,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`CandidateRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn candidate_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CandidateRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        full_name: "Ada Lovelace".to_string(),
        title: Some("Staff Engineer".to_string()),
        city: Some("Medina".to_string()),
        state: Some("OH".to_string()),
        zip: Some("44256".to_string()),
        latitude: Some(Decimal::new(41_143_400, 6)),
        longitude: Some(Decimal::new(-81_863_200, 6)),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.full_name, "Ada Lovelace");
    assert_eq!(row.zip.as_deref(), Some("44256"));
    assert!(row.latitude.is_some());
    assert!(row.is_active);
}

#[test]
fn new_candidate_supports_zip_only_profiles() {
    let candidate = NewCandidate {
        full_name: "Zip Only".to_string(),
        title: None,
        city: None,
        state: None,
        zip: Some("44256".to_string()),
        latitude: None,
        longitude: None,
    };

    assert!(candidate.latitude.is_none());
    assert!(candidate.longitude.is_none());
    assert_eq!(candidate.zip.as_deref(), Some("44256"));
}
