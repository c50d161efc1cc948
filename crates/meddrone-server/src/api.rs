//! REST API routes.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::state::AppState;
use meddrone_core::models::DispatchRecord;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/calcDeliveryPath", post(calc_delivery_path))
        .route(
            "/api/v1/calcDeliveryPathAsGeoJson",
            post(calc_delivery_path_geojson),
        )
}

async fn health() -> &'static str {
    "OK"
}

/// POST /api/v1/calcDeliveryPath
///
/// Plans the dispatch batch and returns the structured result. Fetch
/// failures degrade to defaults; an empty batch is a client error.
async fn calc_delivery_path(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<DispatchRecord>>,
) -> impl IntoResponse {
    if dispatches.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let reference = state.data.fetch_reference_or_default().await;
    let result = meddrone_core::plan(&dispatches, &reference, &state.planner);
    Json(result).into_response()
}

/// POST /api/v1/calcDeliveryPathAsGeoJson
///
/// Same planning pass, rendered as a GeoJSON FeatureCollection.
async fn calc_delivery_path_geojson(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<DispatchRecord>>,
) -> impl IntoResponse {
    if dispatches.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let reference = state.data.fetch_reference_or_default().await;
    let result = meddrone_core::plan(&dispatches, &reference, &state.planner);
    let body = meddrone_core::to_feature_collection(&result);
    (
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
