use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use talentgeo_core::Coordinate;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ResolveData {
    pub zip: String,
    pub coordinate: Coordinate,
    pub place: Option<String>,
    pub region: Option<String>,
}

pub(super) async fn resolve_zip(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(zip): Path<String>,
) -> Result<Json<ApiResponse<ResolveData>>, ApiError> {
    let mut resolver = state.resolver.lock().await;
    let resolved = resolver.resolve(&zip).await.map_err(|e| {
        tracing::warn!(zip, error = %e, "geocoding source unavailable");
        ApiError::new(
            req_id.0.clone(),
            "upstream_error",
            "geocoding source unavailable; try again",
        )
    })?;
    drop(resolver);

    match resolved {
        Some(r) => Ok(Json(ApiResponse {
            data: ResolveData {
                zip: r.zip,
                coordinate: r.coordinate,
                place: r.place,
                region: r.region,
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("zip {zip} is not a resolvable US zip code"),
        )),
    }
}
