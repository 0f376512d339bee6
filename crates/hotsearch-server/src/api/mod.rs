mod cache;
mod health;
mod hot_search;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use hotsearch_core::Platform;
use hotsearch_pipeline::{HealthMonitor, HotSearchReader};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Debug, Clone)]
pub struct AppState {
    pub reader: HotSearchReader,
    pub health: Arc<HealthMonitor>,
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

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn json(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
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
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Parses an optional query value; blank counts as absent.
pub(super) fn parse_optional<T>(
    request_id: &str,
    field: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|e| {
            ApiError::new(request_id, "validation_error", format!("invalid {field}: {e}"))
        }),
    }
}

pub(super) fn parse_platform(request_id: &str, raw: &str) -> Result<Platform, ApiError> {
    raw.parse::<Platform>()
        .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

pub(super) fn map_cache_error(request_id: String, error: &hotsearch_cache::CacheError) -> ApiError {
    tracing::error!(error = %error, "cache operation failed");
    ApiError::new(request_id, "internal_error", "cache operation failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/hot-search", get(hot_search::list_hot_search))
        .route(
            "/api/v1/hot-search/refresh",
            post(hot_search::refresh_hot_search),
        )
        .route(
            "/api/v1/hot-search/last-update",
            get(hot_search::last_update),
        )
        .route(
            "/api/v1/hot-search/classification-stats",
            get(hot_search::classification_stats),
        )
        .route("/api/v1/search", get(hot_search::search))
        .route(
            "/api/v1/health/platform/{platform}",
            get(health::platform_health),
        )
        .route("/api/v1/cache/clear-all", post(cache::clear_all))
        .route("/api/v1/cache/clear/{platform}", post(cache::clear_platform))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health::health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
