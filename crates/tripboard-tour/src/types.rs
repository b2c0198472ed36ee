//! Tourism API response types.
//!
//! Every endpoint wraps its rows in
//! `{"response": {"header": {...}, "body": {"items": {"item": [...]}}}}`.
//! Two wire quirks are absorbed by [`ApiBody::into_items`]: an empty result
//! arrives as `"items": ""`, and a single row may arrive as an object
//! instead of a one-element array.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::raw::scalar_to_string;

/// Result code the upstream uses for success.
pub const RESULT_CODE_OK: &str = "0000";

/// Top-level envelope for all tourism API responses.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub response: ApiResponse,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub header: ApiHeader,
    #[serde(default)]
    pub body: Option<ApiBody>,
}

/// Result header. Also the whole body of flat gateway errors.
#[derive(Debug, Deserialize)]
pub struct ApiHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiBody {
    #[serde(default)]
    pub items: Value,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u32>,
}

impl ApiHeader {
    /// `true` when the upstream reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result_code == RESULT_CODE_OK
    }
}

impl ApiBody {
    /// Flattens the `items.item` container into a list of rows.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        match self.items {
            Value::Object(mut items) => match items.remove("item") {
                Some(Value::Array(rows)) => rows,
                Some(row @ Value::Object(_)) => vec![row],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// detailCommon
// ---------------------------------------------------------------------------

/// Attributes shared by every content type, from `detailCommon`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonInfo {
    #[serde(alias = "contentid", default, deserialize_with = "lenient_string")]
    pub content_id: Option<String>,
    #[serde(alias = "contenttypeid", default, deserialize_with = "lenient_string")]
    pub content_type_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(alias = "addr1", default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(alias = "addr2", default, deserialize_with = "lenient_string")]
    pub address_detail: Option<String>,
    #[serde(alias = "zipcode", default, deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub overview: Option<String>,
    #[serde(alias = "firstimage", default, deserialize_with = "lenient_string")]
    pub first_image: Option<String>,
    #[serde(alias = "firstimage2", default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(alias = "mapx", default, deserialize_with = "lenient_string")]
    pub map_x: Option<String>,
    #[serde(alias = "mapy", default, deserialize_with = "lenient_string")]
    pub map_y: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cat1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cat2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cat3: Option<String>,
    #[serde(alias = "areacode", default, deserialize_with = "lenient_string")]
    pub area_code: Option<String>,
    #[serde(alias = "sigungucode", default, deserialize_with = "lenient_string")]
    pub sigungu_code: Option<String>,
    #[serde(alias = "createdtime", default, deserialize_with = "lenient_string")]
    pub created_time: Option<String>,
    #[serde(alias = "modifiedtime", default, deserialize_with = "lenient_string")]
    pub modified_time: Option<String>,
}

impl CommonInfo {
    /// `(longitude, latitude)` when both coordinates parse.
    ///
    /// The upstream reports WGS84 with `mapx` as longitude and `mapy` as
    /// latitude.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let x = self.map_x.as_deref()?.trim().parse::<f64>().ok()?;
        let y = self.map_y.as_deref()?.trim().parse::<f64>().ok()?;
        Some((x, y))
    }

    /// Classification codes from broadest to narrowest, stopping at the
    /// first missing level.
    #[must_use]
    pub fn category_path(&self) -> Vec<&str> {
        [&self.cat1, &self.cat2, &self.cat3]
            .into_iter()
            .map_while(|c| c.as_deref())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// detailInfo (travel course)
// ---------------------------------------------------------------------------

/// One stop of a travel course. Ordered by [`CourseStepRecord::sub_num`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStepRecord {
    #[serde(alias = "subnum", deserialize_with = "lenient_u32")]
    pub sub_num: u32,
    #[serde(alias = "subcontentid", default, deserialize_with = "lenient_string")]
    pub sub_content_id: Option<String>,
    #[serde(alias = "subname", default)]
    pub sub_name: String,
    #[serde(alias = "subdetailimg", default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(alias = "subdetailalt", default, deserialize_with = "lenient_string")]
    pub image_alt: Option<String>,
    #[serde(alias = "subdetailoverview", default, deserialize_with = "lenient_string")]
    pub overview: Option<String>,
}

// ---------------------------------------------------------------------------
// categoryCode
// ---------------------------------------------------------------------------

/// One entry of the classification code catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryCode {
    pub code: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32_opt")]
    pub rnum: Option<u32>,
}

/// A resolved classification level for a place (1 = broadest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationTag {
    pub level: u8,
    pub code: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Lenient scalar helpers
// ---------------------------------------------------------------------------

/// Accepts a string, number, bool or null; blank strings become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).filter(|s| !s.trim().is_empty()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_u32_opt(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer"))
}

fn lenient_u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).and_then(|s| s.trim().parse::<u32>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(items: Value) -> ApiBody {
        serde_json::from_value(serde_json::json!({ "items": items, "totalCount": 1 })).unwrap()
    }

    #[test]
    fn into_items_handles_array() {
        let rows = body(serde_json::json!({ "item": [{ "a": "1" }, { "a": "2" }] })).into_items();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn into_items_handles_single_object() {
        let rows = body(serde_json::json!({ "item": { "a": "1" } })).into_items();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], "1");
    }

    #[test]
    fn into_items_handles_empty_string() {
        assert!(body(serde_json::json!("")).into_items().is_empty());
    }

    #[test]
    fn common_info_parses_upstream_names() {
        let info: CommonInfo = serde_json::from_value(serde_json::json!({
            "contentid": "126508",
            "contenttypeid": "12",
            "title": "경복궁",
            "addr1": "서울특별시 종로구 사직로 161",
            "addr2": "",
            "mapx": "126.9769930325",
            "mapy": "37.5788222356",
            "cat1": "A02",
            "cat2": "A0201",
            "cat3": "A02010100",
            "areacode": 1
        }))
        .unwrap();

        assert_eq!(info.content_id.as_deref(), Some("126508"));
        assert_eq!(info.address_detail, None);
        assert_eq!(info.area_code.as_deref(), Some("1"));
        let (x, y) = info.coordinates().unwrap();
        assert!((x - 126.977).abs() < 0.001);
        assert!((y - 37.579).abs() < 0.001);
        assert_eq!(info.category_path(), vec!["A02", "A0201", "A02010100"]);
    }

    #[test]
    fn common_info_serializes_camel_case() {
        let info = CommonInfo {
            first_image: Some("http://tong.visitkorea.or.kr/a.jpg".to_string()),
            ..CommonInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["firstImage"], "http://tong.visitkorea.or.kr/a.jpg");
    }

    #[test]
    fn category_path_stops_at_first_gap() {
        let info = CommonInfo {
            cat1: Some("A02".to_string()),
            cat3: Some("A02010100".to_string()),
            ..CommonInfo::default()
        };
        assert_eq!(info.category_path(), vec!["A02"]);
    }

    #[test]
    fn course_step_accepts_string_index_and_blank_image() {
        let step: CourseStepRecord = serde_json::from_value(serde_json::json!({
            "subnum": "2",
            "subcontentid": "2613093",
            "subname": "정동진",
            "subdetailimg": "",
            "subdetailoverview": "해돋이 명소"
        }))
        .unwrap();

        assert_eq!(step.sub_num, 2);
        assert_eq!(step.sub_name, "정동진");
        assert_eq!(step.image, None);
        assert_eq!(step.overview.as_deref(), Some("해돋이 명소"));
    }

    #[test]
    fn course_step_rejects_missing_index() {
        let result = serde_json::from_value::<CourseStepRecord>(serde_json::json!({
            "subname": "정동진"
        }));
        assert!(result.is_err());
    }
}
