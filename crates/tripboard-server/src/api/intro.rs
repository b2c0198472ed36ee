use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tripboard_tour::{field_mappings, normalize, CanonicalField, ContentType, NormalizedIntroRecord, RawIntroRecord};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NormalizeRequest {
    content_type_id: String,
    raw: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(super) struct FieldItem {
    name: &'static str,
    label: &'static str,
    content_types: Vec<&'static str>,
}

pub(super) async fn list_fields(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<FieldItem>>> {
    let declared: Vec<(ContentType, Vec<CanonicalField>)> = ContentType::ALL
        .iter()
        .map(|ct| {
            let fields = field_mappings(*ct).into_iter().map(|m| m.canonical).collect();
            (*ct, fields)
        })
        .collect();

    let data = CanonicalField::ALL
        .iter()
        .map(|field| FieldItem {
            name: field.as_str(),
            label: field.label(),
            content_types: declared
                .iter()
                .filter(|(_, fields)| fields.contains(field))
                .map(|(ct, _)| ct.code())
                .collect(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn normalize_intro(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NormalizeRequest>,
) -> Result<Json<ApiResponse<NormalizedIntroRecord>>, ApiError> {
    let raw = RawIntroRecord::from_json(&body.raw).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            "raw must be a JSON object of intro fields",
        )
    })?;

    let data = normalize(&raw, &body.content_type_id);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
