use axum::{
    extract::{Query, State},
    Extension, Json,
};
use hotsearch_core::{Category, HotSearchItem, Platform};
use hotsearch_pipeline::{ClassificationStats, LastUpdate};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{parse_optional, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HotSearchQuery {
    pub platform: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefreshQuery {
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub keyword: Option<String>,
}

pub(super) async fn list_hot_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HotSearchQuery>,
) -> Result<Json<ApiResponse<Vec<HotSearchItem>>>, ApiError> {
    let platform: Option<Platform> =
        parse_optional(&req_id.0, "platform", query.platform.as_deref())?;
    let category: Option<Category> =
        parse_optional(&req_id.0, "category", query.category.as_deref())?;

    let items = state.reader.query(platform, category).await;
    Ok(ApiResponse::json(items, req_id.0))
}

/// Forces a live refresh of every platform, or of one platform when
/// `?platform=` is given.
pub(super) async fn refresh_hot_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ApiResponse<Vec<HotSearchItem>>>, ApiError> {
    let platform: Option<Platform> =
        parse_optional(&req_id.0, "platform", query.platform.as_deref())?;

    let items = match platform {
        Some(platform) => state.reader.resolver().refresh_platform(platform).await.items,
        None => state.reader.refresh_all().await,
    };
    Ok(ApiResponse::json(items, req_id.0))
}

pub(super) async fn last_update(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<LastUpdate>> {
    ApiResponse::json(state.reader.last_update().await, req_id.0)
}

pub(super) async fn classification_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ClassificationStats>> {
    ApiResponse::json(state.reader.classification_stats().await, req_id.0)
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<HotSearchItem>>>, ApiError> {
    let Some(keyword) = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "keyword is required",
        ));
    };

    let items = state.reader.search(keyword).await;
    Ok(ApiResponse::json(items, req_id.0))
}
