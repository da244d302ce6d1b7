//! Integration tests for atp-server API endpoints
//!
//! Tests cover:
//! - Health and build info endpoints
//! - /parse_table success, warnings and failure bodies
//! - /calculate verdicts, default target and validation
//! - /plan end-to-end with OCR confidence

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use atp_common::config::TomlConfig;
use atp_server::{build_router, AppState};

/// Test helper: Create app with compiled-default settings
fn setup_app() -> axum::Router {
    build_router(AppState::new(&TomlConfig::default()))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Send request, return status and JSON body
async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = setup_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

fn warning_kinds(body: &Value) -> Vec<String> {
    body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["kind"].as_str().unwrap().to_string())
        .collect()
}

fn result_for<'a>(body: &'a Value, subject: &str) -> &'a Value {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["subject"] == subject)
        .unwrap_or_else(|| panic!("no result for {}", subject))
}

// =============================================================================
// Health / build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "atp-server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let (status, body) = send(get_request("/api/buildinfo")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// /parse_table
// =============================================================================

#[tokio::test]
async fn test_parse_table_header_layout() {
    let text = "Monday | Tuesday\nMath | Physics\nmath. | Lunch";
    let (status, body) = send(post_json("/parse_table", json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timetable"], json!({ "math": 2, "physics": 1 }));
    assert_eq!(body["entries"].as_array().unwrap().len(), 3);
    assert_eq!(body["raw_text"], text);
    assert_eq!(warning_kinds(&body), vec!["merged_subject_variants"]);
}

#[tokio::test]
async fn test_parse_table_headerless_reports_warning() {
    let text = "Math | Physics\nChem | Math";
    let (status, body) = send(post_json("/parse_table", json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timetable"], json!({ "chem": 1, "math": 2, "physics": 1 }));
    assert!(warning_kinds(&body).contains(&"missing_header".to_string()));

    let warning = &body["warnings"][0];
    assert!(!warning["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_parse_table_no_entries_echoes_text() {
    let text = "Monday | Tuesday\nLunch | Free";
    let (status, body) = send(post_json("/parse_table", json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "no_entries_found");
    assert_eq!(body["raw_text"], text);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_parse_table_empty_input() {
    let (status, body) = send(post_json("/parse_table", json!({ "text": "  \n\t\n" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "empty_input");
    assert_eq!(body["raw_text"], "  \n\t\n");
}

#[tokio::test]
async fn test_parse_table_rejects_out_of_range_confidence() {
    let body = json!({ "text": "Monday\nMath", "confidence": 140.0 });
    let (status, body) = send(post_json("/parse_table", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/parse_table")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_body");
    assert!(body.get("raw_text").is_none());
}

// =============================================================================
// /calculate
// =============================================================================

#[tokio::test]
async fn test_calculate_can_miss() {
    let body = json!({
        "overallPercent": 80,
        "totalLectures": 50,
        "targetPercent": 75,
        "remainingWeeks": 4,
        "timetable": { "Math": 3 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::OK);
    let math = result_for(&body, "math");
    assert_eq!(math["weeklySessions"], 3);
    assert_eq!(math["remainingSessions"], 12);
    assert_eq!(math["verdict"], json!({ "kind": "can_miss", "count": 3 }));
    assert!(math["message"].as_str().unwrap().contains('3'));
}

#[tokio::test]
async fn test_calculate_unreachable() {
    let body = json!({
        "overallPercent": 60,
        "totalLecturesHeld": 50,
        "targetPercent": 75,
        "remainingWeeks": 4,
        "timetable": { "math": 3 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::OK);
    let math = result_for(&body, "math");
    assert_eq!(math["verdict"], json!({ "kind": "already_below_reachable" }));
    assert_eq!(math["message"], "Not possible to reach target attendance.");
}

#[tokio::test]
async fn test_calculate_uses_default_target() {
    let body = json!({
        "overallPercent": 80,
        "totalLectures": 50,
        "remainingWeeks": 4,
        "timetable": { "math": 3 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        result_for(&body, "math")["verdict"],
        json!({ "kind": "can_miss", "count": 3 })
    );
}

#[tokio::test]
async fn test_calculate_merges_subject_variants() {
    let body = json!({
        "overallPercent": 80,
        "totalLectures": 50,
        "targetPercent": 75,
        "remainingWeeks": 4,
        "timetable": { "Math": 2, "math ": 1, "Art": 0 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["weeklySessions"], 3);
}

#[tokio::test]
async fn test_calculate_saturates_merged_counts() {
    let body = json!({
        "overallPercent": 80,
        "totalLectures": 50,
        "targetPercent": 75,
        "remainingWeeks": 4,
        "timetable": { "Math": 4294967295u32, "math": 1 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::OK);
    let math = result_for(&body, "math");
    assert_eq!(math["weeklySessions"], 4294967295u32);
    assert_eq!(math["remainingSessions"], 4 * 4294967295u64);
    assert_eq!(math["verdict"], json!({ "kind": "can_miss", "count": 3 }));
}

#[tokio::test]
async fn test_calculate_invalid_snapshot() {
    let body = json!({
        "overallPercent": 120,
        "totalLectures": 50,
        "targetPercent": 75,
        "remainingWeeks": 4,
        "timetable": { "math": 3 }
    });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_snapshot");
    assert!(body["error"].as_str().unwrap().contains("overallPercent"));
}

#[tokio::test]
async fn test_calculate_missing_field_is_malformed() {
    let body = json!({ "overallPercent": 80, "timetable": { "math": 3 } });
    let (status, body) = send(post_json("/calculate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_body");
}

// =============================================================================
// /plan
// =============================================================================

#[tokio::test]
async fn test_plan_end_to_end() {
    let text = "| Time | Monday | Tuesday | Wednesday |\n\
                | 9:00 | Math | Physics | Math |\n\
                | 10:00 | Chem | LUNCH | math |";
    let body = json!({
        "text": text,
        "confidence": 91.5,
        "overallPercent": 80,
        "totalLectures": 50,
        "targetPercent": 75,
        "remainingWeeks": 4
    });
    let (status, body) = send(post_json("/plan", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timetable"], json!({ "chem": 1, "math": 3, "physics": 1 }));
    assert_eq!(body["raw_text"], text);
    assert!(!warning_kinds(&body).contains(&"low_confidence".to_string()));

    let math = result_for(&body, "math");
    assert_eq!(math["remainingSessions"], 12);
    assert_eq!(math["verdict"], json!({ "kind": "can_miss", "count": 3 }));
}

#[tokio::test]
async fn test_plan_low_confidence_warning() {
    let body = json!({
        "text": "Monday | Tuesday\nMath | Physics",
        "confidence": 35,
        "overallPercent": 80,
        "totalLectures": 50,
        "remainingWeeks": 4
    });
    let (status, body) = send(post_json("/plan", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(warning_kinds(&body).contains(&"low_confidence".to_string()));
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_plan_failure_echoes_text() {
    let body = json!({
        "text": "Lunch | Break | -",
        "overallPercent": 80,
        "totalLectures": 50,
        "remainingWeeks": 4
    });
    let (status, body) = send(post_json("/plan", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "no_entries_found");
    assert_eq!(body["raw_text"], "Lunch | Break | -");
}

#[tokio::test]
async fn test_plan_invalid_snapshot_still_echoes_text() {
    let body = json!({
        "text": "Monday\nMath",
        "overallPercent": 80,
        "totalLectures": -1,
        "remainingWeeks": 4
    });
    let (status, body) = send(post_json("/plan", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_snapshot");
    assert_eq!(body["raw_text"], "Monday\nMath");
}
