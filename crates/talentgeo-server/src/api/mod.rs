mod resolve;
mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use talentgeo_geocode::ZipResolver;

use crate::middleware::{request_id, RequestId};

/// Shared handler state.
///
/// The resolver sits behind a mutex because resolution writes the cache
/// map; the single lock is the single-writer discipline the cache needs
/// under concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resolver: Arc<Mutex<ZipResolver>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unresolvable_center" => StatusCode::UNPROCESSABLE_ENTITY,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/talent/search", get(search::search_talent))
        .route("/api/v1/geo/resolve/{zip}", get(resolve::resolve_zip))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match talentgeo_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::search::{SearchData, SearchMatchItem};
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use talentgeo_core::{Coordinate, ZipRegion, ZipRegionTable};
    use talentgeo_geocode::{CacheEntry, GeoCache, GeocodeClient};
    use tower::ServiceExt;

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unresolvable_center_maps_to_unprocessable() {
        let response =
            ApiError::new("req-1", "unresolvable_center", "cannot geocode").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn search_match_item_is_serializable() {
        let item = SearchMatchItem {
            public_id: uuid::Uuid::new_v4(),
            full_name: "Medina Candidate".to_string(),
            title: Some("Engineer".to_string()),
            city: Some("Medina".to_string()),
            state: Some("OH".to_string()),
            zip: Some("44256".to_string()),
            distance_miles: 10.3,
        };
        let json = serde_json::to_string(&item).expect("serialize SearchMatchItem");
        assert!(json.contains("\"full_name\":\"Medina Candidate\""));
        assert!(json.contains("\"distance_miles\":10.3"));
    }

    #[test]
    fn search_data_is_serializable() {
        let data = SearchData {
            center_zip: "44289".to_string(),
            center: Coordinate {
                latitude: 41.0262,
                longitude: -81.8465,
            },
            center_source: "exact".to_string(),
            strategy: "native".to_string(),
            matches: vec![],
        };
        let json = serde_json::to_string(&data).expect("serialize SearchData");
        assert!(json.contains("\"strategy\":\"native\""));
        assert!(json.contains("\"center_source\":\"exact\""));
    }

    // -------------------------------------------------------------------------
    // Route integration tests (with DB)
    // -------------------------------------------------------------------------

    fn test_state(pool: sqlx::PgPool) -> AppState {
        let client = GeocodeClient::with_base_url(1, "http://127.0.0.1:9")
            .expect("client construction should not fail");
        let mut cache = GeoCache::new(
            std::env::temp_dir().join(format!("talentgeo-server-{}.json", uuid::Uuid::new_v4())),
        );
        cache.put(
            "44289".to_owned(),
            CacheEntry {
                coordinate: Coordinate::new(41.0262, -81.8465),
                place: Some("Sterling".to_owned()),
                region: Some("OH".to_owned()),
            },
        );
        let regions = ZipRegionTable::from_regions(vec![ZipRegion {
            prefix_start: 430,
            prefix_end: 459,
            latitude: 41.0,
            longitude: -81.8,
            label: Some("NE Ohio".to_owned()),
        }])
        .expect("valid region table");

        let resolver = ZipResolver::new(client, cache, regions, 0);
        AppState {
            pool,
            resolver: Arc::new(Mutex::new(resolver)),
        }
    }

    async fn seed_candidates(pool: &sqlx::PgPool) {
        talentgeo_db::insert_candidates(
            pool,
            &[
                talentgeo_db::NewCandidate {
                    full_name: "Medina Candidate".to_owned(),
                    title: None,
                    city: Some("Medina".to_owned()),
                    state: Some("OH".to_owned()),
                    zip: Some("44256".to_owned()),
                    latitude: Some(41.1434),
                    longitude: Some(-81.8632),
                },
                talentgeo_db::NewCandidate {
                    full_name: "New York Candidate".to_owned(),
                    title: None,
                    city: Some("New York".to_owned()),
                    state: Some("NY".to_owned()),
                    zip: Some("10001".to_owned()),
                    latitude: Some(40.7484),
                    longitude: Some(-73.9967),
                },
            ],
        )
        .await
        .expect("seed candidates");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: sqlx::PgPool) {
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_returns_ranked_matches(pool: sqlx::PgPool) {
        seed_candidates(&pool).await;
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/talent/search?zip=44289&radius_miles=50")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let matches = json["data"]["matches"].as_array().expect("matches array");
        assert_eq!(matches.len(), 1, "only Medina is within 50 miles");
        assert_eq!(
            matches[0]["full_name"].as_str(),
            Some("Medina Candidate"),
            "Medina ranked first"
        );
        assert_eq!(json["data"]["center_source"].as_str(), Some("exact"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_with_unresolvable_center_returns_422(pool: sqlx::PgPool) {
        seed_candidates(&pool).await;
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/talent/search?zip=00000&radius_miles=50")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(
            json["error"]["code"].as_str(),
            Some("unresolvable_center"),
            "typed failure, not an empty result set"
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_with_bad_radius_returns_400(pool: sqlx::PgPool) {
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/talent/search?zip=44289&radius_miles=-10")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_with_unknown_strategy_returns_400(pool: sqlx::PgPool) {
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/talent/search?zip=44289&radius_miles=50&strategy=quadtree")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn resolve_returns_cached_coordinate(pool: sqlx::PgPool) {
        let app = build_app(test_state(pool));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/geo/resolve/44289")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["zip"].as_str(), Some("44289"));
        assert_eq!(json["data"]["place"].as_str(), Some("Sterling"));
        assert!(
            (json["data"]["coordinate"]["latitude"].as_f64().unwrap() - 41.0262).abs() < 1e-4
        );
    }
}
