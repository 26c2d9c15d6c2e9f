use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use talentgeo_core::Coordinate;
use talentgeo_db::{RadiusSearch, SearchError, SearchStrategy};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    zip: String,
    radius_miles: f64,
    strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchMatchItem {
    pub public_id: uuid::Uuid,
    pub full_name: String,
    pub title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub distance_miles: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    pub center_zip: String,
    pub center: Coordinate,
    pub center_source: String,
    pub strategy: String,
    pub matches: Vec<SearchMatchItem>,
}

pub(super) async fn search_talent(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let strategy = match params.strategy.as_deref() {
        None => None,
        Some(raw) => Some(raw.parse::<SearchStrategy>().map_err(|e| {
            ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
        })?),
    };

    let mut resolver = state.resolver.lock().await;
    let search = talentgeo_db::find_within_radius(
        &state.pool,
        &mut resolver,
        &params.zip,
        params.radius_miles,
        strategy,
    )
    .await
    .map_err(|e| map_search_error(req_id.0.clone(), &e))?;
    drop(resolver);

    Ok(Json(ApiResponse {
        data: search_data(search),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn search_data(search: RadiusSearch) -> SearchData {
    SearchData {
        center_zip: search.center_zip,
        center: search.center,
        center_source: search.center_source.to_string(),
        strategy: search.strategy.to_string(),
        matches: search
            .matches
            .into_iter()
            .map(|m| SearchMatchItem {
                public_id: m.public_id,
                full_name: m.full_name,
                title: m.title,
                city: m.city,
                state: m.state,
                zip: m.zip,
                distance_miles: m.distance_miles,
            })
            .collect(),
    }
}

fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::UnresolvableCenter { zip } => ApiError::new(
            request_id,
            "unresolvable_center",
            format!("zip {zip} cannot be located; search unavailable"),
        ),
        SearchError::InvalidRadius(_) => ApiError::new(
            request_id,
            "validation_error",
            "radius_miles must be a positive number",
        ),
        SearchError::Spatial(e) => {
            tracing::error!(error = %e, "spatial query failed");
            ApiError::new(request_id, "internal_error", "search unavailable")
        }
    }
}
