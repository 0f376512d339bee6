use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use hotsearch_pipeline::PlatformHealth;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{parse_platform, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    platforms: Vec<PlatformHealth>,
}

pub(super) async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let resolver = state.reader.resolver();
    let platforms = state.health.check_all(resolver.cache()).await;

    match resolver.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                    platforms,
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
                        platforms,
                    },
                    meta,
                }),
            )
        }
    }
}

pub(super) async fn platform_health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<PlatformHealth>>, ApiError> {
    let platform = parse_platform(&req_id.0, &platform)?;

    let report = state
        .health
        .check(platform, state.reader.resolver().cache())
        .await;
    Ok(ApiResponse::json(report, req_id.0))
}
