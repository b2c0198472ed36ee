//! Assembly of the full place-detail record.
//!
//! [`fetch_place_detail`] fans out to the upstream endpoints, isolates each
//! call's failure, and always returns a renderable [`PlaceDetail`].

use futures::future::join_all;
use serde::Serialize;

use crate::canonical::NormalizedIntroRecord;
use crate::client::TourApiClient;
use crate::content_type::ContentType;
use crate::error::TourApiError;
use crate::normalize::normalize;
use crate::raw::RawIntroRecord;
use crate::types::{ClassificationTag, CommonInfo, CourseStepRecord};

/// The upstream call a [`PartFailure`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPart {
    Common,
    Classification,
    Intro,
    CourseSteps,
}

impl std::fmt::Display for DetailPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Common => "common",
            Self::Classification => "classification",
            Self::Intro => "intro",
            Self::CourseSteps => "course_steps",
        };
        f.write_str(s)
    }
}

/// One upstream call that failed while assembling a [`PlaceDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartFailure {
    pub part: DetailPart,
    pub message: String,
}

/// Everything the detail view renders for one place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    pub content_id: String,
    pub content_type_id: String,
    /// `None` when `content_type_id` is not one of the eight known codes.
    pub content_type: Option<ContentType>,
    pub common: Option<CommonInfo>,
    pub tags: Vec<ClassificationTag>,
    pub intro: NormalizedIntroRecord,
    pub course_steps: Vec<CourseStepRecord>,
    pub failures: Vec<PartFailure>,
}

impl PlaceDetail {
    /// `true` when every upstream call succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches and assembles the detail record for one place.
///
/// Common info, intro and (travel courses only) course steps are requested
/// concurrently; classification names are resolved once the common info
/// supplies `cat1..cat3`. A failing call is logged and recorded in
/// [`PlaceDetail::failures`], and its part falls back to the empty value.
/// The intro is always normalized, on an empty record if the fetch failed.
pub async fn fetch_place_detail(
    client: &TourApiClient,
    content_id: &str,
    content_type_id: &str,
) -> PlaceDetail {
    let content_type_id = content_type_id.trim();
    let content_type = ContentType::from_code(content_type_id);
    let mut failures = Vec::new();

    let course_steps_fut = async {
        if content_type == Some(ContentType::Course) {
            client.course_steps(content_id).await
        } else {
            Ok(Vec::new())
        }
    };

    let (common, raw_intro, course_steps) = tokio::join!(
        client.detail_common(content_id),
        client.detail_intro(content_id, content_type_id),
        course_steps_fut,
    );

    let common = match common {
        Ok(Some(info)) => Some(info),
        Ok(None) => {
            tracing::warn!(content_id, "place detail: no common info row");
            failures.push(PartFailure {
                part: DetailPart::Common,
                message: format!("no common info for content id {content_id}"),
            });
            None
        }
        Err(e) => {
            record_failure(&mut failures, DetailPart::Common, content_id, &e);
            None
        }
    };

    let raw_intro = raw_intro.unwrap_or_else(|e| {
        record_failure(&mut failures, DetailPart::Intro, content_id, &e);
        RawIntroRecord::new()
    });

    let course_steps = course_steps.unwrap_or_else(|e| {
        record_failure(&mut failures, DetailPart::CourseSteps, content_id, &e);
        Vec::new()
    });

    let tags = match &common {
        Some(info) => resolve_classification(client, content_id, info, &mut failures).await,
        None => Vec::new(),
    };

    let intro = normalize(&raw_intro, content_type_id);

    tracing::debug!(
        content_id,
        content_type_id,
        intro_fields = intro.len(),
        course_steps = course_steps.len(),
        failures = failures.len(),
        "place detail assembled"
    );

    PlaceDetail {
        content_id: content_id.to_string(),
        content_type_id: content_type_id.to_string(),
        content_type,
        common,
        tags,
        intro,
        course_steps,
        failures,
    }
}

/// Looks up the display name of every classification level present on
/// `info`, one catalogue request per level.
async fn resolve_classification(
    client: &TourApiClient,
    content_id: &str,
    info: &CommonInfo,
    failures: &mut Vec<PartFailure>,
) -> Vec<ClassificationTag> {
    let path = info.category_path();

    let lookups = path.iter().enumerate().map(|(idx, code)| {
        let cat1 = if idx >= 1 { path.first().copied() } else { None };
        let cat2 = if idx >= 2 { path.get(1).copied() } else { None };
        async move { (idx, *code, client.category_codes(None, cat1, cat2).await) }
    });

    let mut tags = Vec::with_capacity(path.len());
    for (idx, code, result) in join_all(lookups).await {
        // `category_path` yields at most three levels.
        #[allow(clippy::cast_possible_truncation)]
        let level = idx as u8 + 1;
        match result {
            Ok(entries) => match entries.into_iter().find(|c| c.code == code) {
                Some(entry) => tags.push(ClassificationTag {
                    level,
                    code: entry.code,
                    name: entry.name,
                }),
                None => tracing::debug!(content_id, code, level, "classification code not in catalogue"),
            },
            Err(e) => {
                tracing::warn!(content_id, code, level, error = %e, "place detail: classification lookup failed");
                failures.push(PartFailure {
                    part: DetailPart::Classification,
                    message: format!("level {level} ({code}): {e}"),
                });
            }
        }
    }
    tags
}

fn record_failure(
    failures: &mut Vec<PartFailure>,
    part: DetailPart,
    content_id: &str,
    err: &TourApiError,
) {
    tracing::warn!(content_id, part = %part, error = %err, "place detail: upstream call failed");
    failures.push(PartFailure {
        part,
        message: err.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_part_serializes_snake_case() {
        let json = serde_json::to_value(DetailPart::CourseSteps).unwrap();
        assert_eq!(json, "course_steps");
        assert_eq!(DetailPart::CourseSteps.to_string(), "course_steps");
    }

    #[test]
    fn place_detail_serializes_camel_case_with_null_content_type() {
        let detail = PlaceDetail {
            content_id: "1".to_string(),
            content_type_id: "999".to_string(),
            content_type: None,
            common: None,
            tags: Vec::new(),
            intro: NormalizedIntroRecord::new(),
            course_steps: Vec::new(),
            failures: vec![PartFailure {
                part: DetailPart::Intro,
                message: "boom".to_string(),
            }],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["contentTypeId"], "999");
        assert!(json["contentType"].is_null());
        assert_eq!(json["courseSteps"], serde_json::json!([]));
        assert_eq!(json["failures"][0]["part"], "intro");
        assert!(!detail.is_complete());
    }
}
