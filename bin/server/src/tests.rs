use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use letters_core::{ListOrder, MemoryStore, MessageStore};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{build_app, config::DisplayMode, service::LettersService};
use down_store::DownStore;

/// Store double whose backend is always down
mod down_store {
    use async_trait::async_trait;
    use letters_core::{
        ChangeNotifier, ListOrder, Message, MessageEvent, MessageStore, NewMessage, StoreError,
        StoreResult,
    };
    use tokio::sync::broadcast;

    #[derive(Debug, Default)]
    pub struct DownStore {
        notifier: ChangeNotifier,
    }

    fn down<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    #[async_trait]
    impl MessageStore for DownStore {
        async fn list(&self, _name_filter: Option<&str>) -> StoreResult<Vec<Message>> {
            down()
        }

        async fn create(&self, _draft: NewMessage) -> StoreResult<Message> {
            down()
        }

        async fn update(&self, _id: i64, _message: &str) -> StoreResult<Message> {
            down()
        }

        async fn delete(&self, _id: i64) -> StoreResult<Message> {
            down()
        }

        async fn health_check(&self) -> StoreResult<bool> {
            down()
        }

        fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
            self.notifier.subscribe()
        }

        fn order(&self) -> ListOrder {
            ListOrder::NewestFirst
        }
    }
}

fn app_with(store: Arc<dyn MessageStore>, mode: DisplayMode) -> Router {
    build_app(Arc::new(LettersService::with_store(store, mode)))
}

fn memory_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(ListOrder::InsertionOrder));
    (app_with(store.clone(), DisplayMode::SearchOnly), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_raw(body: &str, content_type: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/messages")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    post_raw(&body.to_string(), "application/json")
}

async fn create(app: &Router, name: &str, message: &str) -> Value {
    let (status, body) = send(app, post_json(json!({ "name": name, "message": message }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_create_returns_trimmed_record_that_list_returns() {
    let (app, _store) = memory_app();

    let (status, body) = send(
        &app,
        post_json(json!({ "name": "  Ann ", "message": "\n I never said it \t" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Message added successfully");
    assert_eq!(body["data"]["name"], "Ann");
    assert_eq!(body["data"]["message"], "I never said it");
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["timestamp"].is_string());

    let (status, listed) = send(&app, get("/messages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["messages"], json!([body["data"]]));
}

#[tokio::test]
async fn test_create_rejects_missing_fields_without_storing() {
    let (app, store) = memory_app();

    for payload in [
        json!({ "name": "", "message": "x" }),
        json!({ "name": "x", "message": "" }),
        json!({ "message": "x" }),
        json!({ "name": null, "message": "x" }),
        json!({ "name": "x" }),
        json!({}),
        json!({ "name": "   ", "message": "x" }),
    ] {
        let (status, body) = send(&app, post_json(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body, json!({ "error": "Name and message are required" }));
    }

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_create_rejects_malformed_bodies() {
    let (app, store) = memory_app();

    for raw in [
        "{not json",
        "",
        "null",
        "[1, 2]",
        r#"["Ann","hi"]"#,
        r#""Ann""#,
        r#"{"name": 5, "message": "x"}"#,
    ] {
        let (status, body) = send(&app, post_raw(raw, "application/json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
        assert_eq!(body, json!({ "error": "Invalid request body" }));
    }

    assert!(store.is_empty().await);

    // The server keeps serving after bad input
    create(&app, "Ann", "still here").await;
}

#[tokio::test]
async fn test_create_ignores_content_type() {
    let (app, _store) = memory_app();

    let (status, body) = send(
        &app,
        post_raw(r#"{"name":"Ann","message":"plain"}"#, "text/plain"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["message"], "plain");
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let (app, _store) = memory_app();
    let ann = create(&app, "Ann", "one").await;
    let annie = create(&app, "ANNIE", "two").await;
    create(&app, "Bob", "three").await;

    let (status, body) = send(&app, get("/messages?name=Ann")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([ann, annie]));

    let (_, body) = send(&app, get("/messages?name=")).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_without_matches_is_empty_list() {
    let (app, _store) = memory_app();
    create(&app, "Ann", "one").await;

    let (status, body) = send(&app, get("/messages?name=zzz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "messages": [] }));
}

#[tokio::test]
async fn test_search_decodes_query_values() {
    let (app, _store) = memory_app();
    let target = create(&app, "Ann Marie", "hello").await;
    create(&app, "Marie", "hello").await;

    let (_, body) = send(&app, get("/messages?name=ann%20mar")).await;
    assert_eq!(body["messages"], json!([target]));
}

#[tokio::test]
async fn test_newest_first_store_orders_responses() {
    let store = Arc::new(MemoryStore::new(ListOrder::NewestFirst));
    let app = app_with(store, DisplayMode::Always);
    let first = create(&app, "Ann", "one").await;
    let second = create(&app, "Ann", "two").await;

    let (_, body) = send(&app, get("/messages")).await;
    assert_eq!(body["messages"], json!([second, first]));
}

#[tokio::test]
async fn test_unparseable_query_is_internal_error() {
    let (app, _store) = memory_app();

    let (status, body) = send(&app, get("/messages?name=a&name=b")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_store_failures_map_to_500() {
    let app = app_with(Arc::new(DownStore::default()), DisplayMode::SearchOnly);

    let (status, body) = send(&app, get("/messages?name=Ann")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch messages" }));

    let (status, body) = send(&app, post_json(json!({ "name": "Ann", "message": "x" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save message" }));

    // Validation still runs before the store is touched
    let (status, _) = send(&app, post_json(json!({ "name": "", "message": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (app, store) = memory_app();

    let requests = (0..25).map(|i| {
        let app = app.clone();
        async move { create(&app, "Ann", &format!("letter {}", i)).await }
    });
    let created = futures::future::join_all(requests).await;

    let ids: HashSet<i64> = created.iter().map(|m| m["id"].as_i64().unwrap()).collect();
    assert_eq!(ids.len(), 25);

    let (_, body) = send(&app, get("/messages")).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 25);
    assert_eq!(store.len().await, 25);
}

#[tokio::test]
async fn test_healthcheck_reflects_store() {
    let (app, _store) = memory_app();
    let (status, body) = send(&app, get("/healthcheck")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let app = app_with(Arc::new(DownStore::default()), DisplayMode::SearchOnly);
    let (status, body) = send(&app, get("/healthcheck")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "status": "unhealthy" }));
}

#[tokio::test]
async fn test_index_page_carries_display_mode() {
    let store = Arc::new(MemoryStore::default());
    let app = app_with(store, DisplayMode::Always);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("const SHOW_ALL = true;"));
    assert!(page.contains("Unsent Letters"));
}
