//! Relay ingestion over real sockets and through the mountable router.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

mod common;

const LOG_EVENT: &str = r#"{"type":"log","level":"log","ts":"2024-05-01T10:00:00.000Z","args":["hello",{"a":1}],"argsSerialized":["hello","{\n  \"a\": 1\n}"]}"#;

#[tokio::test]
async fn test_valid_event_is_rendered() {
    let relay = common::start_relay(1_000_000).await;
    let client = common::client();

    let res = client
        .post(relay.url())
        .header("content-type", "application/json")
        .body(LOG_EVENT)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    let out = relay.output.contents();
    assert!(out.contains("[LOG"));
    assert!(out.contains("2024-05-01T10:00:00.000Z"));
    assert!(out.contains("hello"));
    assert_eq!(relay.relay.stats().snapshot().accepted, 1);

    relay.stop().await;
}

#[tokio::test]
async fn test_error_and_table_events_render() {
    let relay = common::start_relay(1_000_000).await;
    let client = common::client();

    let error = r#"{"type":"error","level":"error","ts":"t","args":[],"argsSerialized":[],"errors":[{"name":"TypeError","message":"bad input","stack":"at main"}]}"#;
    let table = r#"{"type":"table","level":"table","ts":"t","table":{"columns":["a","b"],"rows":[{"a":1,"b":2},{"a":3}]},"summary":"2 row(s), 2 column(s)"}"#;

    for body in [error, table] {
        let res = client.post(relay.url()).body(body).send().await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    }

    let out = relay.output.contents();
    assert!(out.contains("TypeError: bad input"));
    assert!(out.contains("at main"));
    assert!(out.contains("2 row(s), 2 column(s)"));
    assert!(out.contains("(index)"));

    relay.stop().await;
}

#[tokio::test]
async fn test_get_is_rejected_without_reading() {
    let relay = common::start_relay(1_000_000).await;

    let res = common::client().get(relay.url()).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(relay.relay.stats().snapshot().method_rejected, 1);

    relay.stop().await;
}

#[tokio::test]
async fn test_wrong_path_is_not_found() {
    let relay = common::start_relay(1_000_000).await;

    let res = common::client()
        .post(format!("{}/elsewhere", relay.base()))
        .body(LOG_EVENT)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(relay.output.contents().is_empty());

    relay.stop().await;
}

#[tokio::test]
async fn test_invalid_payloads_complete_normally() {
    let relay = common::start_relay(1_000_000).await;
    let client = common::client();

    for body in [
        "not json",
        "[1,2,3]",
        r#"{"type":"log","level":"log"}"#,
        r#"{"type":"verbose","level":"verbose","ts":"t"}"#,
    ] {
        let res = client.post(relay.url()).body(body).send().await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    }

    let stats = relay.relay.stats().snapshot();
    assert_eq!(stats.invalid, 4);
    assert_eq!(stats.accepted, 0);
    assert!(relay.output.contents().is_empty());

    relay.stop().await;
}

#[tokio::test]
async fn test_oversized_body_aborts_connection() {
    let relay = common::start_relay(64).await;

    let body = format!(r#"{{"type":"log","level":"log","ts":"t","pad":"{}"}}"#, "x".repeat(200));
    let result = common::client().post(relay.url()).body(body).send().await;

    let rejected = match result {
        Err(_) => true,
        Ok(res) => !res.status().is_success(),
    };
    assert!(rejected);

    let stats = relay.relay.stats().snapshot();
    assert_eq!(stats.oversized, 1);
    assert_eq!(stats.invalid, 0);
    assert_eq!(stats.accepted, 0);
    assert!(relay.output.contents().is_empty());

    // The relay keeps serving after an abort.
    let res = common::client()
        .post(relay.url())
        .body(r#"{"type":"info","level":"info","ts":"t"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    relay.stop().await;
}

#[tokio::test]
async fn test_mounted_router() {
    let (relay, output) = common::test_relay(64);
    let app = std::sync::Arc::clone(&relay).router();

    let ok = Request::builder()
        .method(Method::POST)
        .uri("/__log")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"type":"debug","level":"debug","ts":"t","args":[],"argsSerialized":[]}"#))
        .unwrap();
    let res = app.clone().oneshot(ok).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(output.contents().contains("(no args)"));

    let big = "y".repeat(100);
    let oversized = Request::builder()
        .method(Method::POST)
        .uri("/__log")
        .header(header::CONTENT_LENGTH, big.len())
        .body(Body::from(big))
        .unwrap();
    let res = app.clone().oneshot(oversized).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()[header::CONNECTION], "close");

    let get = Request::builder()
        .method(Method::GET)
        .uri("/__log")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(get).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let stats = relay.stats().snapshot();
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.oversized, 1);
    assert_eq!(stats.method_rejected, 1);
}
