//! Integration tests for `fetch_place_detail` using wiremock HTTP mocks.

use tripboard_tour::{fetch_place_detail, CanonicalField, ContentType, DetailPart, TourApiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TourApiClient {
    TourApiClient::with_base_url("test-key", "tripboard", 30, base_url)
        .expect("client construction should not fail")
        .with_retry(0, 0)
}

fn envelope(items: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "response": {
            "header": { "resultCode": "0000", "resultMsg": "OK" },
            "body": { "items": items, "numOfRows": 10, "pageNo": 1, "totalCount": 1 }
        }
    })
}

async fn mount_json(server: &MockServer, op: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{op}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/categoryCode2"))
        .and(query_param("cat1", "A02"))
        .and(query_param("cat2", "A0201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "item": [{ "code": "A02010100", "name": "고궁" }]
        }))))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categoryCode2"))
        .and(query_param("cat1", "A02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "item": [{ "code": "A0201", "name": "역사관광지" }]
        }))))
        .with_priority(2)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categoryCode2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::json!({
            "item": [{ "code": "A01", "name": "자연" }, { "code": "A02", "name": "인문(문화/예술/역사)" }]
        }))))
        .with_priority(3)
        .mount(server)
        .await;
}

fn common_row(content_type_id: &str) -> serde_json::Value {
    envelope(serde_json::json!({
        "item": [{
            "contentid": "126508",
            "contenttypeid": content_type_id,
            "title": "경복궁",
            "cat1": "A02",
            "cat2": "A0201",
            "cat3": "A02010100"
        }]
    }))
}

#[tokio::test]
async fn assembles_full_detail() {
    let server = MockServer::start().await;
    mount_json(&server, "detailCommon2", common_row("12")).await;
    mount_json(
        &server,
        "detailIntro2",
        envelope(serde_json::json!({
            "item": { "usetime": "09:00~18:00<br>", "restdate": "매주 화요일" }
        })),
    )
    .await;
    mount_categories(&server).await;

    let client = test_client(&server.uri());
    let detail = fetch_place_detail(&client, "126508", "12").await;

    assert!(detail.is_complete(), "unexpected failures: {:?}", detail.failures);
    assert_eq!(detail.content_type, Some(ContentType::Attraction));
    assert_eq!(
        detail.common.as_ref().and_then(|c| c.title.as_deref()),
        Some("경복궁")
    );
    assert_eq!(detail.intro.get(CanonicalField::RestDate), Some("매주 화요일"));
    assert!(detail.course_steps.is_empty());

    let tags: Vec<(u8, &str)> = detail.tags.iter().map(|t| (t.level, t.name.as_str())).collect();
    assert_eq!(
        tags,
        vec![(1, "인문(문화/예술/역사)"), (2, "역사관광지"), (3, "고궁")]
    );
}

#[tokio::test]
async fn course_fetches_steps() {
    let server = MockServer::start().await;
    mount_json(&server, "detailCommon2", envelope(serde_json::json!(""))).await;
    mount_json(
        &server,
        "detailIntro2",
        envelope(serde_json::json!({ "item": { "distance": "12.5km", "taketime": "4시간" } })),
    )
    .await;
    mount_json(
        &server,
        "detailInfo2",
        envelope(serde_json::json!({
            "item": [
                { "subnum": "1", "subname": "두 번째" },
                { "subnum": "0", "subname": "첫 번째" }
            ]
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let detail = fetch_place_detail(&client, "1957474", "25").await;

    assert_eq!(detail.intro.get(CanonicalField::CourseDistance), Some("12.5km"));
    assert_eq!(detail.intro.get(CanonicalField::SpendTime), Some("4시간"));
    let names: Vec<&str> = detail.course_steps.iter().map(|s| s.sub_name.as_str()).collect();
    assert_eq!(names, vec!["첫 번째", "두 번째"]);

    // Missing common info is recorded but does not block the rest.
    assert_eq!(detail.failures.len(), 1);
    assert_eq!(detail.failures[0].part, DetailPart::Common);
    assert!(detail.tags.is_empty());
}

#[tokio::test]
async fn intro_failure_is_isolated() {
    let server = MockServer::start().await;
    mount_json(&server, "detailCommon2", common_row("39")).await;
    mount_categories(&server).await;
    Mock::given(method("GET"))
        .and(path("/detailIntro2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = fetch_place_detail(&client, "126508", "39").await;

    assert!(detail.common.is_some());
    assert_eq!(detail.tags.len(), 3);
    assert_eq!(detail.failures.len(), 1);
    assert_eq!(detail.failures[0].part, DetailPart::Intro);

    // The normalizer still runs on the empty record.
    assert_eq!(detail.intro.get(CanonicalField::FirstMenu), Some(""));
    assert!(detail.intro.display_rows().is_empty());
}

#[tokio::test]
async fn every_part_failing_still_returns_a_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resultCode": "30",
            "resultMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = fetch_place_detail(&client, "1", "25").await;

    let parts: Vec<DetailPart> = detail.failures.iter().map(|f| f.part).collect();
    assert!(parts.contains(&DetailPart::Common));
    assert!(parts.contains(&DetailPart::Intro));
    assert!(parts.contains(&DetailPart::CourseSteps));
    assert!(detail.common.is_none());
    assert!(detail.course_steps.is_empty());
    assert!(!detail.intro.is_empty(), "declared slots are still present");
}

#[tokio::test]
async fn unknown_content_type_yields_empty_intro() {
    let server = MockServer::start().await;
    mount_json(&server, "detailCommon2", envelope(serde_json::json!(""))).await;
    mount_json(
        &server,
        "detailIntro2",
        envelope(serde_json::json!({ "item": { "usetime": "09:00" } })),
    )
    .await;

    let client = test_client(&server.uri());
    let detail = fetch_place_detail(&client, "1", "999").await;

    assert_eq!(detail.content_type, None);
    assert!(detail.intro.is_empty());
}

#[tokio::test]
async fn service_key_never_reaches_the_detail_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TourApiClient::with_base_url("SECRET-KEY-123", "tripboard", 30, &server.uri())
        .expect("client")
        .with_retry(0, 0);
    let detail = fetch_place_detail(&client, "1957474", "25").await;

    assert_eq!(detail.failures.len(), 3, "common, intro and course steps all fail");
    let json = serde_json::to_string(&detail).expect("serialize");
    assert!(!json.contains("SECRET-KEY-123"), "service key leaked: {json}");
    for failure in &detail.failures {
        assert!(failure.message.contains("500"), "status is kept: {}", failure.message);
    }
}
