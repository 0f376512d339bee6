use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_cache_error, parse_platform, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct CacheCleared {
    cleared: String,
}

pub(super) async fn clear_all(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CacheCleared>>, ApiError> {
    state
        .reader
        .resolver()
        .cache()
        .clear_all()
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    tracing::info!("api: cleared all cache entries");
    Ok(ApiResponse::json(
        CacheCleared {
            cleared: "all".to_owned(),
        },
        req_id.0,
    ))
}

pub(super) async fn clear_platform(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<CacheCleared>>, ApiError> {
    let platform = parse_platform(&req_id.0, &platform)?;

    state
        .reader
        .resolver()
        .cache()
        .clear_platform(platform)
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    tracing::info!(%platform, "api: cleared platform cache entry");
    Ok(ApiResponse::json(
        CacheCleared {
            cleared: platform.to_string(),
        },
        req_id.0,
    ))
}
