// ABOUTME: HTTP handlers for /scrape, /podcast and /health plus the JSON error mapping.
// ABOUTME: Domain mismatches answer 400; every other pipeline failure answers 500.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gleaner_core::{ExtractError, ExtractionResult};
use gleaner_podcast::EpisodeSummary;
use serde::{Deserialize, Serialize};

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    /// A link, or share text containing one.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    podcast_enabled: bool,
}

/// Wraps pipeline errors so they render as JSON responses.
#[derive(Debug)]
pub struct ApiError(pub ExtractError);

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code.as_str().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        podcast_enabled: state.podcast.is_some(),
    })
}

pub async fn scrape_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let result = state.scraper.scrape(&query.url).await?;
    Ok(Json(result))
}

pub async fn podcast_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<EpisodeSummary>, ApiError> {
    let Some(podcast) = state.podcast.as_ref() else {
        return Err(ApiError(ExtractError::upstream(
            query.url,
            "Podcast",
            Some(anyhow::anyhow!("credentials not configured")),
        )));
    };
    let summary = podcast.summarize(&query.url).await?;
    Ok(Json(summary))
}
