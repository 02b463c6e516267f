//! HTTP API surface
//!
//! Thin axum wrapper over [`WeatherService`]: request bodies in, core
//! operations invoked, results and typed errors mapped to status codes.
//! No resolution logic lives here.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::SkycastError;
use crate::models::{GeoCandidate, WeatherResult};
use crate::resolver::WeatherService;

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
}

#[derive(Deserialize)]
struct CoordinatesRequest {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct AutocompleteRequest {
    query: String,
}

#[derive(Serialize)]
struct AutocompleteResponse {
    suggestions: Vec<GeoCandidate>,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build the weather API router
pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/weather/search", post(search))
        .route("/weather/coordinates", post(coordinates))
        .route("/weather/autocomplete", post(autocomplete))
        .with_state(service)
}

async fn search(
    State(service): State<Arc<WeatherService>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<WeatherResult>, ApiError> {
    service
        .resolve_by_search(&request.query)
        .await
        .map(Json)
        .map_err(into_api_error)
}

async fn coordinates(
    State(service): State<Arc<WeatherService>>,
    Json(request): Json<CoordinatesRequest>,
) -> Result<Json<WeatherResult>, ApiError> {
    service
        .resolve_by_coordinates(request.lat, request.lon)
        .await
        .map(Json)
        .map_err(into_api_error)
}

async fn autocomplete(
    State(service): State<Arc<WeatherService>>,
    Json(request): Json<AutocompleteRequest>,
) -> Json<AutocompleteResponse> {
    let suggestions = service.suggest(&request.query).await;
    Json(AutocompleteResponse { suggestions })
}

fn into_api_error(err: SkycastError) -> ApiError {
    let status = match &err {
        SkycastError::NotFound { .. } => StatusCode::NOT_FOUND,
        SkycastError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => {
            error!("Weather lookup failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            message: err.user_message(),
        }),
    )
}
