//! Integration tests for the ingest server.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use api::sink::InMemorySink;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static STATIC_DIR: OnceLock<PathBuf> = OnceLock::new();

const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// A build directory with an `index.html` and one asset, shared by every
/// test in this binary.
fn static_dir() -> PathBuf {
    STATIC_DIR
        .get_or_init(|| {
            let dir = std::env::temp_dir().join(format!("survey-build-{}", std::process::id()));
            std::fs::create_dir_all(dir.join("static")).unwrap();
            std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
            std::fs::write(dir.join("static").join("app.js"), "console.log('survey');").unwrap();
            dir
        })
        .clone()
}

fn setup() -> (axum::Router, InMemorySink) {
    let sink = InMemorySink::new();
    let state = api::create_state(Arc::new(sink.clone()));
    let app = api::create_app(state, get_metrics_handle(), &static_dir());
    (app, sink)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/study-data")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert!(timestamp.ends_with('Z'));
    }
}

#[tokio::test]
async fn test_submit_study_data_acknowledges_and_records() {
    let (app, sink) = setup();

    let response = app
        .oneshot(post_json(
            serde_json::json!({
                "prolificId": "ABC123",
                "timeSpent": 125,
                "responses": {
                    "ageGroup": "25-34",
                    "experienceLevel": "novice",
                    "feedback": "smooth"
                },
                "startTime": "2024-05-01T10:00:00.000Z",
                "endTime": "2024-05-01T10:02:05.000Z"
            })
            .to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "success": true, "message": "Data received" })
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prolific_id, "ABC123");
    assert_eq!(records[0].time_spent, 125);
    assert_eq!(records[0].responses["feedback"], "smooth");
}

#[tokio::test]
async fn test_submit_accepts_missing_fields() {
    let (app, sink) = setup();

    let response = app.oneshot(post_json("{}".to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].prolific_id.is_null());
    assert!(records[0].responses.is_null());
}

#[tokio::test]
async fn test_each_submission_gets_its_own_receipt() {
    let (app, sink) = setup();
    let body = serde_json::json!({ "prolificId": "XYZ", "timeSpent": 3 }).to_string();

    for _ in 0..2 {
        let response = app.clone().oneshot(post_json(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].receipt_id, records[1].receipt_id);
}

#[tokio::test]
async fn test_malformed_json_is_rejected_before_recording() {
    let (app, sink) = setup();

    let response = app
        .oneshot(post_json("{\"prolificId\": ".to_string()))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    let body = body_bytes(response).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&body).is_err());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let (app, sink) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/study-data")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_unknown_path_serves_index() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/thank-you")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn test_root_and_assets_are_served() {
    let (app, _) = setup();

    let root = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(root.status(), StatusCode::OK);
    assert_eq!(body_bytes(root).await, INDEX_HTML.as_bytes());

    let asset = app
        .oneshot(
            Request::builder()
                .uri("/static/app.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(asset.status(), StatusCode::OK);
    assert_eq!(body_bytes(asset).await, b"console.log('survey');");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "https://app.prolific.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_counts_submissions() {
    let (app, _) = setup();

    let response = app
        .clone()
        .oneshot(post_json("{}".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("study_submissions_received_total"));
}
