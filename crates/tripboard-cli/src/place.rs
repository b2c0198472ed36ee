//! `place` command handlers. These reach the tourism API and need
//! `TOUR_API_SERVICE_KEY`.

use clap::Subcommand;
use tripboard_core::AppConfig;
use tripboard_tour::display::plain_text;
use tripboard_tour::{fetch_place_detail, PlaceDetail, TourApiClient};

/// Sub-commands available under `place`.
#[derive(Debug, Subcommand)]
pub enum PlaceCommands {
    /// Fetch and print the full detail record for one place
    Detail {
        /// Upstream content id (e.g., 126508)
        #[arg(long)]
        content_id: String,
        /// Content type id of the place (e.g., 12)
        #[arg(long)]
        content_type_id: String,
        /// Print the record as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Builds a tourism API client from the loaded configuration.
///
/// # Errors
///
/// Returns an error if the service key is missing or the client cannot be
/// built.
pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<TourApiClient> {
    let key = config.require_service_key()?;
    let client = TourApiClient::with_base_url(
        key,
        &config.mobile_app,
        config.request_timeout_secs,
        &config.tour_api_base_url,
    )?
    .with_retry(config.max_retries, config.retry_backoff_base_ms);
    Ok(client)
}

/// Fetches a place's detail record and prints it.
///
/// Per-part upstream failures are reported on stderr; the rest of the record
/// is still printed.
///
/// # Errors
///
/// Returns an error if the client cannot be built or output serialization
/// fails.
pub(crate) async fn run_place_detail(
    config: &AppConfig,
    content_id: &str,
    content_type_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let detail = fetch_place_detail(&client, content_id, content_type_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", render_text(&detail));
    }

    for failure in &detail.failures {
        eprintln!("warning: {} unavailable: {}", failure.part, failure.message);
    }
    Ok(())
}

/// Renders a place detail record as terminal text.
pub(crate) fn render_text(detail: &PlaceDetail) -> String {
    let mut out = String::new();
    let common = detail.common.as_ref();

    let title = common
        .and_then(|c| c.title.as_deref())
        .unwrap_or("(untitled)");
    let kind = detail
        .content_type
        .map_or_else(|| detail.content_type_id.clone(), |ct| ct.label().to_string());
    out.push_str(&format!("{title} [{kind}] #{}\n", detail.content_id));

    if let Some(common) = common {
        let address = [common.address.as_deref(), common.address_detail.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !address.is_empty() {
            out.push_str(&format!("주소: {address}\n"));
        }
        if let Some(tel) = common.tel.as_deref() {
            out.push_str(&format!("전화: {}\n", plain_text(tel)));
        }
        if let Some(homepage) = common.homepage.as_deref() {
            out.push_str(&format!("홈페이지: {}\n", plain_text(homepage)));
        }
    }

    if !detail.tags.is_empty() {
        let path = detail
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(" > ");
        out.push_str(&format!("분류: {path}\n"));
    }

    let rows = detail.intro.display_rows();
    if rows.is_empty() {
        out.push_str("\n추가 정보 없음\n");
    } else {
        out.push('\n');
        for row in rows {
            let value = plain_text(&row.value).replace('\n', "\n    ");
            out.push_str(&format!("{}: {value}\n", row.label));
        }
    }

    if !detail.course_steps.is_empty() {
        out.push_str("\n코스\n");
        for (idx, step) in detail.course_steps.iter().enumerate() {
            out.push_str(&format!("{:>3}. {}\n", idx + 1, step.sub_name));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripboard_tour::{
        normalize, ClassificationTag, CommonInfo, ContentType, CourseStepRecord, RawIntroRecord,
    };

    fn detail(content_type_id: &str, raw: &[(&str, &str)]) -> PlaceDetail {
        let raw: RawIntroRecord = raw.iter().copied().collect();
        PlaceDetail {
            content_id: "126508".to_string(),
            content_type_id: content_type_id.to_string(),
            content_type: ContentType::from_code(content_type_id),
            common: Some(CommonInfo {
                title: Some("경복궁".to_string()),
                address: Some("서울특별시 종로구 사직로 161".to_string()),
                ..CommonInfo::default()
            }),
            tags: vec![ClassificationTag {
                level: 1,
                code: "A02".to_string(),
                name: "인문".to_string(),
            }],
            intro: normalize(&raw, content_type_id),
            course_steps: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn render_text_shows_header_and_intro_rows() {
        let text = render_text(&detail("12", &[("usetime", "09:00~18:00<br>입장마감 17:00")]));
        assert!(text.starts_with("경복궁 [관광지] #126508\n"), "{text}");
        assert!(text.contains("주소: 서울특별시 종로구 사직로 161\n"));
        assert!(text.contains("분류: 인문\n"));
        assert!(text.contains(": 09:00~18:00\n    입장마감 17:00\n"), "{text}");
    }

    #[test]
    fn render_text_reports_no_additional_info() {
        let text = render_text(&detail("39", &[]));
        assert!(text.contains("추가 정보 없음"));
    }

    #[test]
    fn render_text_lists_course_steps_in_order() {
        let mut d = detail("25", &[]);
        d.course_steps = vec![
            CourseStepRecord {
                sub_num: 0,
                sub_content_id: None,
                sub_name: "경포대".to_string(),
                image: None,
                image_alt: None,
                overview: None,
            },
            CourseStepRecord {
                sub_num: 1,
                sub_content_id: None,
                sub_name: "오죽헌".to_string(),
                image: None,
                image_alt: None,
                overview: None,
            },
        ];
        let text = render_text(&d);
        assert!(text.contains("  1. 경포대\n  2. 오죽헌\n"), "{text}");
    }

    #[test]
    fn unknown_content_type_falls_back_to_id() {
        let text = render_text(&detail("999", &[]));
        assert!(text.starts_with("경복궁 [999]"));
    }
}
