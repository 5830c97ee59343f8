//! Relay behavior against a mock upstream generation API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::any;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use petrolytics_server::routes::router;
use petrolytics_server::state::{AppState, GenerationConfig};

/// Spawns an HTTP server that answers every request with `response` and
/// returns its base URL.
async fn spawn_upstream(response: (StatusCode, Value)) -> String {
    let app = Router::new().fallback(any(move || {
        let (status, body) = response.clone();
        async move { (status, Json(body)) }
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn relay_for(base_url: String) -> Router {
    let state = AppState::shared(GenerationConfig {
        base_url,
        model: "gemini-2.5-flash".into(),
        api_key: "test-key".into(),
    })
    .unwrap();
    router(state)
}

fn chat_request(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn successful_generation_is_relayed() {
    let upstream = spawn_upstream((
        StatusCode::OK,
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": "hi there" } ] } }
            ]
        }),
    ))
    .await;
    let app = relay_for(upstream);

    let response = app.oneshot(chat_request("hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "response": "hi there" }));
}

#[tokio::test]
async fn upstream_error_becomes_500_with_detail() {
    let upstream = spawn_upstream((
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": { "message": "model overloaded" } }),
    ))
    .await;
    let app = relay_for(upstream);

    let response = app.oneshot(chat_request("hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.is_empty());
}

#[tokio::test]
async fn empty_candidate_list_becomes_500() {
    let upstream = spawn_upstream((StatusCode::OK, json!({ "candidates": [] }))).await;
    let app = relay_for(upstream);

    let response = app.oneshot(chat_request("hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_text_field_gets_json_detail() {
    let upstream = spawn_upstream((StatusCode::OK, json!({}))).await;
    let app = relay_for(upstream);

    let request = Request::builder()
        .method("POST")
        .uri("/chat/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("text"));
}

#[tokio::test]
async fn unknown_route_is_not_served() {
    let upstream = spawn_upstream((StatusCode::OK, json!({}))).await;
    let app = relay_for(upstream);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
