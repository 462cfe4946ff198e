//! AI client against a stand-in summarization service on a local port.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use thinknotes::{ai::AiClient, ai::AiError, config::AiConfig};

async fn spawn_service(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> AiClient {
    AiClient::new(&AiConfig {
        base_url,
        enabled: true,
    })
}

async fn summarize(Json(body): Json<Value>) -> impl IntoResponse {
    let content = body["content"].as_str().unwrap_or_default();
    if content.contains("slow") {
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({"detail": "took too long"})),
        );
    }
    if content.contains("bad") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Content cannot be empty"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "summary": format!("<think>max {}</think>Summary of note.", body["max_length"])
        })),
    )
}

async fn suggest_tags(Json(body): Json<Value>) -> Json<Value> {
    assert!(body["title"].as_str().is_some());
    Json(json!({
        "tags": ["<think>hmm</think>rust", "Rust", "  ", "web", "async", "cli"],
        "count": 6
    }))
}

fn service() -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({"status": "ok"})) }))
        .route("/summarize", post(summarize))
        .route("/suggest-tags", post(suggest_tags))
}

#[tokio::test]
async fn summary_is_returned_verbatim() {
    let ai = client(spawn_service(service()).await);
    assert!(ai.is_available().await);

    let summary = ai
        .summarize("A note that is long enough.", 120)
        .await
        .expect("summary");
    assert_eq!(summary, "<think>max 120</think>Summary of note.");
}

#[tokio::test]
async fn service_errors_are_mapped() {
    let ai = client(spawn_service(service()).await);

    let err = ai.summarize("this one is slow to process", 100).await.unwrap_err();
    assert!(matches!(err, AiError::Timeout));

    let err = ai.summarize("this one is bad input", 100).await.unwrap_err();
    match err {
        AiError::Rejected { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Content cannot be empty");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = ai.summarize("  \n ", 100).await.unwrap_err();
    assert!(matches!(err, AiError::InvalidInput(_)));
}

#[tokio::test]
async fn short_notes_can_be_summarized() {
    let ai = client(spawn_service(service()).await);
    let summary = ai.summarize("todo", 100).await.expect("summary");
    assert!(summary.ends_with("Summary of note."));

    let err = ai.suggest_tags("todo", "Chores", 3).await.unwrap_err();
    assert!(matches!(err, AiError::InvalidInput(_)));
}

#[tokio::test]
async fn suggested_tags_are_cleaned() {
    let ai = client(spawn_service(service()).await);
    let tags = ai
        .suggest_tags("Notes about building web services.", "Axum", 3)
        .await
        .expect("tags");
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0], "rust");
    assert!(!tags.iter().any(|t| t.contains("think")));
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let ai = client(format!("http://{}", addr));
    assert!(!ai.is_available().await);
    let err = ai
        .summarize("A note that is long enough.", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Unavailable(_)));
}
