//! HTTP client for the Korea tourism data API.
//!
//! Wraps `reqwest` with the upstream's fixed query parameters, result-code
//! checking, retry on transient failures, and typed row extraction.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TourApiError;
use crate::raw::RawIntroRecord;
use crate::retry::{QuotaGate, RetryPolicy};
use crate::types::{ApiBody, ApiEnvelope, ApiHeader, CategoryCode, CommonInfo, CourseStepRecord};

const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr/B551011/KorService2/";

const OP_DETAIL_COMMON: &str = "detailCommon2";
const OP_DETAIL_INTRO: &str = "detailIntro2";
const OP_DETAIL_INFO: &str = "detailInfo2";
const OP_CATEGORY_CODE: &str = "categoryCode2";

/// Course steps are returned on one page; real courses have a handful.
const COURSE_STEP_PAGE_SIZE: &str = "50";
const CATEGORY_PAGE_SIZE: &str = "100";

/// How long calls are skipped after the gateway reports an exhausted quota.
const QUOTA_COOLDOWN: Duration = Duration::from_secs(60);

/// Client for the tourism data API.
///
/// Use [`TourApiClient::new`] for production or
/// [`TourApiClient::with_base_url`] to point at a mock server in tests.
pub struct TourApiClient {
    client: Client,
    service_key: String,
    mobile_app: String,
    base_url: Url,
    retry: RetryPolicy,
    quota: QuotaGate,
}

impl TourApiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`TourApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        service_key: &str,
        mobile_app: &str,
        timeout_secs: u64,
    ) -> Result<Self, TourApiError> {
        Self::with_base_url(service_key, mobile_app, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`TourApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TourApiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        service_key: &str,
        mobile_app: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TourApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tripboard/0.1 (place-detail)")
            .build()
            .map_err(http_error)?;

        // Exactly one trailing slash so that `Url::join` appends the operation
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| TourApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            service_key: service_key.to_owned(),
            mobile_app: mobile_app.to_owned(),
            base_url,
            retry: RetryPolicy {
                max_retries: 3,
                backoff_base_ms: 500,
            },
            quota: QuotaGate::new(QUOTA_COOLDOWN),
        })
    }

    /// Overrides the retry policy. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, retry_backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy {
            max_retries,
            backoff_base_ms: retry_backoff_base_ms,
        };
        self
    }

    /// Fetches the common attributes of a place.
    ///
    /// Returns `Ok(None)` when the API has no row for `content_id`.
    ///
    /// # Errors
    ///
    /// - [`TourApiError::ApiError`] if the API returns a failure result code.
    /// - [`TourApiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`TourApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn detail_common(&self, content_id: &str) -> Result<Option<CommonInfo>, TourApiError> {
        let rows = self
            .fetch_rows(OP_DETAIL_COMMON, &[("contentId", content_id)])
            .await?;
        rows.into_iter()
            .next()
            .map(|row| parse_row(row, &format!("{OP_DETAIL_COMMON}(contentId={content_id})")))
            .transpose()
    }

    /// Fetches the content-type-specific intro attributes of a place.
    ///
    /// Returns an empty record when the API has no intro row.
    ///
    /// # Errors
    ///
    /// - [`TourApiError::ApiError`] if the API returns a failure result code.
    /// - [`TourApiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`TourApiError::Deserialize`] if the envelope does not match the
    ///   expected shape.
    pub async fn detail_intro(
        &self,
        content_id: &str,
        content_type_id: &str,
    ) -> Result<RawIntroRecord, TourApiError> {
        let rows = self
            .fetch_rows(
                OP_DETAIL_INTRO,
                &[("contentId", content_id), ("contentTypeId", content_type_id)],
            )
            .await?;
        Ok(rows
            .first()
            .and_then(RawIntroRecord::from_json)
            .unwrap_or_default())
    }

    /// Fetches the ordered stops of a travel course.
    ///
    /// Rows that fail to deserialize are skipped with a warning. The result
    /// is sorted by `sub_num`.
    ///
    /// # Errors
    ///
    /// - [`TourApiError::ApiError`] if the API returns a failure result code.
    /// - [`TourApiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`TourApiError::Deserialize`] if the envelope does not match the
    ///   expected shape.
    pub async fn course_steps(&self, content_id: &str) -> Result<Vec<CourseStepRecord>, TourApiError> {
        let rows = self
            .fetch_rows(
                OP_DETAIL_INFO,
                &[
                    ("contentId", content_id),
                    ("contentTypeId", crate::ContentType::Course.code()),
                    ("numOfRows", COURSE_STEP_PAGE_SIZE),
                ],
            )
            .await?;

        let mut steps: Vec<CourseStepRecord> = rows
            .into_iter()
            .filter_map(|row| {
                serde_json::from_value::<CourseStepRecord>(row)
                    .map_err(|e| {
                        tracing::warn!(content_id, error = %e, "course_steps: skipping malformed step");
                    })
                    .ok()
            })
            .collect();
        steps.sort_by_key(|s| s.sub_num);
        Ok(steps)
    }

    /// Lists classification codes one level below the given parents.
    ///
    /// With no parents this is the top level; with `cat1` the second level;
    /// with `cat1` and `cat2` the third.
    ///
    /// # Errors
    ///
    /// - [`TourApiError::ApiError`] if the API returns a failure result code.
    /// - [`TourApiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`TourApiError::Deserialize`] if the envelope does not match the
    ///   expected shape.
    pub async fn category_codes(
        &self,
        content_type_id: Option<&str>,
        cat1: Option<&str>,
        cat2: Option<&str>,
    ) -> Result<Vec<CategoryCode>, TourApiError> {
        let mut params = vec![("numOfRows", CATEGORY_PAGE_SIZE)];
        if let Some(ct) = content_type_id {
            params.push(("contentTypeId", ct));
        }
        if let Some(c) = cat1 {
            params.push(("cat1", c));
        }
        if let Some(c) = cat2 {
            params.push(("cat2", c));
        }

        let rows = self.fetch_rows(OP_CATEGORY_CODE, &params).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                serde_json::from_value::<CategoryCode>(row)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "category_codes: skipping malformed entry");
                    })
                    .ok()
            })
            .collect())
    }

    /// Calls `op` and returns the rows inside the response envelope.
    ///
    /// Result codes are checked inside the retried call so transient codes
    /// are retried like transient HTTP failures.
    async fn fetch_rows(&self, op: &str, extra: &[(&str, &str)]) -> Result<Vec<Value>, TourApiError> {
        let url = self.build_url(op, extra);
        let envelope = self
            .retry
            .run(op, &self.quota, || self.request_envelope(op, &url))
            .await?;

        let body = envelope.response.body;
        let total_count = body.as_ref().and_then(|b| b.total_count);
        let rows = body.map(ApiBody::into_items).unwrap_or_default();
        tracing::debug!(op, total_count = ?total_count, rows = rows.len(), "tour API rows fetched");
        Ok(rows)
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, op: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{op}", self.base_url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("serviceKey", &self.service_key);
            pairs.append_pair("MobileOS", "ETC");
            pairs.append_pair("MobileApp", &self.mobile_app);
            pairs.append_pair("_type", "json");
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// One attempt: fetch the body, then check and type the envelope.
    async fn request_envelope(&self, op: &str, url: &Url) -> Result<ApiEnvelope, TourApiError> {
        let body = self.request_json(url).await?;

        // Gateway errors arrive as a bare header without the envelope.
        if body.get("response").is_none() {
            if let Ok(header) = ApiHeader::deserialize(&body) {
                check_header(&header)?;
            }
        }

        let envelope: ApiEnvelope =
            serde_json::from_value(body).map_err(|e| TourApiError::Deserialize {
                context: format!("{op} envelope"),
                source: e,
            })?;
        check_header(&envelope.response.header)?;
        Ok(envelope)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body
    /// as JSON.
    ///
    /// The gateway answers authentication failures with an XML document
    /// under a 200 status; those are surfaced as [`TourApiError::ApiError`].
    async fn request_json(&self, url: &Url) -> Result<Value, TourApiError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;
        let response = response.error_for_status().map_err(http_error)?;
        let body = response.text().await.map_err(http_error)?;

        if body.trim_start().starts_with('<') {
            return Err(gateway_xml_error(&body));
        }

        serde_json::from_str(&body).map_err(|e| TourApiError::Deserialize {
            context: redact_service_key(url),
            source: e,
        })
    }
}

/// Wraps a transport error without its URL: the query string carries the
/// service key, and these errors end up in logs and API responses.
fn http_error(err: reqwest::Error) -> TourApiError {
    TourApiError::Http(err.without_url())
}

fn check_header(header: &ApiHeader) -> Result<(), TourApiError> {
    if header.is_ok() {
        return Ok(());
    }
    let message = if header.result_msg.is_empty() {
        "unknown error".to_string()
    } else {
        header.result_msg.clone()
    };
    Err(TourApiError::ApiError {
        code: header.result_code.clone(),
        message,
    })
}

fn parse_row<T: DeserializeOwned>(row: Value, context: &str) -> Result<T, TourApiError> {
    serde_json::from_value(row).map_err(|e| TourApiError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Reads `returnReasonCode` and `returnAuthMsg` (or `errMsg`) from the
/// gateway's XML error document.
fn gateway_xml_error(body: &str) -> TourApiError {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut current_tag = String::new();
    let mut reason_code = None;
    let mut auth_msg = None;
    let mut err_msg = None;

    loop {
        let text = match reader.read_event() {
            Ok(Event::Start(e)) => {
                current_tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                continue;
            }
            Ok(Event::End(_)) => {
                current_tag.clear();
                continue;
            }
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(text) => text.into_owned(),
                Err(err) => return TourApiError::Xml(err),
            },
            Ok(Event::CData(e)) => String::from_utf8_lossy(e.as_ref()).into_owned(),
            Ok(Event::Eof) => break,
            Err(err) => return TourApiError::Xml(err),
            Ok(_) => continue,
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        match current_tag.as_str() {
            "returnReasonCode" => reason_code = Some(text),
            "returnAuthMsg" => auth_msg = Some(text),
            "errMsg" => err_msg = Some(text),
            _ => {}
        }
    }

    TourApiError::ApiError {
        code: reason_code.unwrap_or_else(|| "99".to_string()),
        message: auth_msg
            .or(err_msg)
            .unwrap_or_else(|| "unexpected XML response".to_string()),
    }
}

/// The URL with the service key masked, for error contexts and logs.
fn redact_service_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "serviceKey" { "[redacted]".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> TourApiClient {
        TourApiClient::with_base_url("test-key", "tripboard", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://apis.data.go.kr/B551011/KorService2");
        let url = client.build_url("detailIntro2", &[("contentId", "126508")]);
        assert_eq!(
            url.as_str(),
            "https://apis.data.go.kr/B551011/KorService2/detailIntro2?serviceKey=test-key&MobileOS=ETC&MobileApp=tripboard&_type=json&contentId=126508"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash() {
        let with = test_client("https://apis.data.go.kr/B551011/KorService2/");
        let without = test_client("https://apis.data.go.kr/B551011/KorService2");
        assert_eq!(
            with.build_url("detailCommon2", &[]),
            without.build_url("detailCommon2", &[])
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = TourApiClient::with_base_url("a+b/c==", "trip board", 30, "http://localhost")
            .expect("client");
        let url = client.build_url("detailCommon2", &[]);
        assert!(
            url.as_str().contains("serviceKey=a%2Bb%2Fc%3D%3D"),
            "service key should be percent-encoded: {url}"
        );
        assert!(url.as_str().contains("MobileApp=trip+board"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = TourApiClient::with_base_url("k", "app", 30, "not a url");
        assert!(matches!(result, Err(TourApiError::InvalidBaseUrl { .. })));
    }

    fn header(code: &str, msg: &str) -> ApiHeader {
        serde_json::from_value(serde_json::json!({ "resultCode": code, "resultMsg": msg }))
            .expect("header")
    }

    #[test]
    fn check_header_accepts_success_code() {
        assert!(check_header(&header("0000", "OK")).is_ok());
    }

    #[test]
    fn check_header_surfaces_failure_code() {
        let err = check_header(&header("10", "INVALID_REQUEST_PARAMETER_ERROR")).unwrap_err();
        assert!(matches!(
            err,
            TourApiError::ApiError { ref code, ref message }
                if code == "10" && message == "INVALID_REQUEST_PARAMETER_ERROR"
        ));
    }

    #[test]
    fn check_header_fills_blank_message() {
        let err = check_header(&header("22", "")).unwrap_err();
        assert!(matches!(err, TourApiError::ApiError { ref message, .. } if message == "unknown error"));
    }

    fn assert_gateway_error(err: &TourApiError, expected_code: &str, expected_message: &str) {
        assert!(
            matches!(err, TourApiError::ApiError { code, message }
                if code == expected_code && message == expected_message),
            "got {err:?}"
        );
    }

    #[test]
    fn gateway_xml_error_extracts_reason() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
                    <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
                    <returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";
        assert_gateway_error(&gateway_xml_error(body), "30", "SERVICE_KEY_IS_NOT_REGISTERED_ERROR");
    }

    #[test]
    fn gateway_xml_error_reads_cdata_and_attributes() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <OpenAPI_ServiceResponse>
              <cmmMsgHeader>
                <returnAuthMsg><![CDATA[SERVICE_KEY_IS_NOT_REGISTERED_ERROR]]></returnAuthMsg>
                <returnReasonCode xmlns="" >30</returnReasonCode>
              </cmmMsgHeader>
            </OpenAPI_ServiceResponse>"#;
        assert_gateway_error(&gateway_xml_error(body), "30", "SERVICE_KEY_IS_NOT_REGISTERED_ERROR");
    }

    #[test]
    fn gateway_xml_error_unescapes_entities_and_falls_back_to_err_msg() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader>\
                    <errMsg>SERVICE &amp; GATEWAY ERROR</errMsg>\
                    <returnReasonCode>04</returnReasonCode>\
                    </cmmMsgHeader></OpenAPI_ServiceResponse>";
        assert_gateway_error(&gateway_xml_error(body), "04", "SERVICE & GATEWAY ERROR");
    }

    #[test]
    fn gateway_xml_error_without_known_tags_uses_defaults() {
        assert_gateway_error(
            &gateway_xml_error("<html><body>Bad Gateway</body></html>"),
            "99",
            "unexpected XML response",
        );
    }

    #[test]
    fn gateway_xml_error_reports_malformed_document() {
        let err = gateway_xml_error("<OpenAPI_ServiceResponse><errMsg>x</OpenAPI_ServiceResponse>");
        assert!(matches!(err, TourApiError::Xml(_)), "got {err:?}");
    }

    #[test]
    fn redact_service_key_masks_only_the_key() {
        let client = test_client("https://apis.data.go.kr/B551011/KorService2");
        let url = client.build_url("detailIntro2", &[("contentId", "1")]);
        let redacted = redact_service_key(&url);
        assert!(!redacted.contains("test-key"));
        assert!(redacted.contains("contentId=1"));
    }
}
