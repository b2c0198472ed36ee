use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tripboard_tour::{fetch_place_detail, PlaceDetail};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PlaceQuery {
    pub content_type_id: Option<String>,
}

fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Upstream part failures are reported inside `data.failures`; the request
/// itself only fails on bad input or a missing client.
pub(super) async fn get_place_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(content_id): Path<String>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<ApiResponse<PlaceDetail>>, ApiError> {
    if !is_numeric_id(&content_id) {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "content_id must be numeric",
        ));
    }

    let Some(content_type_id) = query
        .content_type_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "content_type_id query parameter is required",
        ));
    };

    let Some(client) = state.client.as_deref() else {
        return Err(ApiError::new(
            req_id.0,
            "service_unavailable",
            "tour API service key is not configured",
        ));
    };

    let data = fetch_place_detail(client, &content_id, content_type_id).await;
    if !data.failures.is_empty() {
        tracing::warn!(
            request_id = %req_id.0,
            content_id = %content_id,
            failures = data.failures.len(),
            "place detail served with missing parts"
        );
    }

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
