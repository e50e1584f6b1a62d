use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_root() {
    let app = common::create_test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_live() {
    let app = common::create_test_app();
    let response = app.oneshot(get("/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_info() {
    let app = common::create_test_app();
    let response = app.oneshot(get("/health/info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "mathdrill-backend");
}

#[tokio::test]
async fn test_list_problem_types() {
    let app = common::create_test_app();
    let response = app.oneshot(get("/api/problems")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let ids: Vec<&str> = body["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"lineareq1"));
    assert!(ids.contains(&"expgrowth1"));
}

#[tokio::test]
async fn test_request_problem_returns_formatted_problem() {
    let app = common::create_test_app();
    let response = app.oneshot(post("/api/problems/lineareq1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["typeId"], "lineareq1");
    let question = body["problem"]["question"].as_str().unwrap();
    assert!(question.starts_with("Solve for x: x + "));
    assert!(body["problem"]["answer"].as_str().unwrap().starts_with("x = "));
    assert!(body["problem"]["explanation"].is_string());
}

#[tokio::test]
async fn test_unknown_problem_type_is_404() {
    let app = common::create_test_app();
    let response = app.oneshot(post("/api/problems/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "UNKNOWN_PROBLEM_TYPE");
}

#[tokio::test]
async fn test_single_candidate_type_exhausts_on_second_request() {
    let app = common::create_test_app();

    let first = app
        .clone()
        .oneshot(post("/api/problems/dummy"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post("/api/problems/dummy")).await.unwrap();
    assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(second).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "EXHAUSTED");
}

#[tokio::test]
async fn test_history_stats_after_request() {
    let app = common::create_test_app();

    app.clone()
        .oneshot(post("/api/problems/dummy"))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/problems/dummy/history/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["stats"]["totalCount"], 1);
    assert_eq!(body["stats"]["days"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_stats_unknown_type_is_404() {
    let app = common::create_test_app();
    let response = app
        .oneshot(get("/api/problems/nope/history/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_cleanup_purges_old_entries() {
    let app = common::create_test_app();

    app.clone()
        .oneshot(post("/api/problems/dummy"))
        .await
        .unwrap();

    // Sweep as-of a far-future day: today's bucket is past any horizon.
    let response = app
        .clone()
        .oneshot(post("/api/admin/history/cleanup?asOf=21000101"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["removed"], 1);

    let stats = app
        .oneshot(get("/api/problems/dummy/history/stats"))
        .await
        .unwrap();
    let stats_body = body_json(stats).await;
    assert_eq!(stats_body["stats"]["totalCount"], 0);
}

#[tokio::test]
async fn test_manual_cleanup_rejects_malformed_day_key() {
    let app = common::create_test_app();
    let response = app
        .oneshot(post("/api/admin/history/cleanup?asOf=2024-01-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_DAY_KEY");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = common::create_test_app();
    let response = app.oneshot(get("/api/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
