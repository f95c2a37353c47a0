//! HTTP surface tests, driving the router directly

use std::{sync::Arc, time::Duration};
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Request, StatusCode},
    Router,
};
use futures::{Stream, StreamExt};
use serde_json::Value;
use tower::ServiceExt;

use countdown_timer::{create_router, AppState};

fn app() -> Router {
    create_router(Arc::new(AppState::new(20554, "127.0.0.1".to_string())))
}

async fn call(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    call_raw(app, method, uri, body.as_bytes().to_vec()).await
}

async fn call_raw(app: &Router, method: &str, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test(start_paused = true)]
async fn set_start_pause_reset_cycle() {
    let app = app();

    let (status, body) = call(&app, "POST", "/set", r#"{"seconds": 65}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["action"], "set");
    assert_eq!(body["timer"]["display"], "01 : 05");
    assert_eq!(body["timer"]["duration_seconds"], 65);

    let (_, body) = call(&app, "POST", "/start", "").await;
    assert_eq!(body["status"], "running");

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let (_, body) = call(&app, "POST", "/pause", "").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 63);
    assert_eq!(body["timer"]["display"], "01 : 03");
    assert_eq!(body["timer"]["start_label"], "Resume");

    let (_, body) = call(&app, "POST", "/reset", "").await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 65);
    assert_eq!(body["timer"]["start_label"], "Start");
}

#[tokio::test(start_paused = true)]
async fn invalid_duration_is_absorbed() {
    let app = app();
    call(&app, "POST", "/set", "30").await;

    for input in ["", "abc", "-4", "0", "2.5", r#"{"seconds": null}"#] {
        let (status, body) = call(&app, "POST", "/set", input).await;
        assert_eq!(status, StatusCode::OK, "input {:?}", input);
        assert_eq!(body["timer"]["duration_seconds"], 30, "input {:?}", input);
        assert_eq!(body["timer"]["remaining_seconds"], 30, "input {:?}", input);
    }
}

#[tokio::test(start_paused = true)]
async fn non_utf8_duration_is_absorbed() {
    let app = app();
    call(&app, "POST", "/set", "30").await;

    for input in [vec![0xff, 0xfe], vec![0xff, 0xfe, 0x31]] {
        let (status, body) = call_raw(&app, "POST", "/set", input.clone()).await;
        assert_eq!(status, StatusCode::OK, "input {:?}", input);
        assert_eq!(body["status"], "idle");
        assert_eq!(body["timer"]["duration_seconds"], 30, "input {:?}", input);
        assert_eq!(body["timer"]["remaining_seconds"], 30, "input {:?}", input);
    }
}

#[tokio::test(start_paused = true)]
async fn start_without_duration_stays_idle() {
    let app = app();

    let (status, body) = call(&app, "POST", "/start", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "00 : 00");

    let (_, body) = call(&app, "GET", "/status", "").await;
    assert_eq!(body["timer"]["run_state"], "idle");
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn status_reports_countdown_and_last_action() {
    let app = app();
    call(&app, "POST", "/set", "3").await;
    call(&app, "POST", "/start", "").await;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let (status, body) = call(&app, "GET", "/status", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 2);
    assert_eq!(body["timer"]["run_state"], "running");
    assert_eq!(body["tick_source_active"], true);
    assert_eq!(body["last_action"], "start");
    assert_eq!(body["port"], 20554);
    assert_eq!(body["host"], "127.0.0.1");

    tokio::time::sleep(Duration::from_secs(5)).await;
    let (_, body) = call(&app, "GET", "/status", "").await;
    assert_eq!(body["timer"]["remaining_seconds"], 0);
    assert_eq!(body["timer"]["run_state"], "idle");
    assert_eq!(body["timer"]["display"], "00 : 00");
    assert_eq!(body["tick_source_active"], false);
}

/// Read frames until the next `timer` event and return its JSON payload
async fn next_timer_event<S, E>(frames: &mut S) -> Value
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    loop {
        let frame = frames.next().await.expect("event stream ended").unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();

        let is_timer = text
            .lines()
            .any(|line| line.strip_prefix("event:").map(str::trim) == Some("timer"));
        let data = text
            .lines()
            .find_map(|line| line.strip_prefix("data:").map(str::trim_start));

        if let (true, Some(data)) = (is_timer, data) {
            return serde_json::from_str(data).unwrap();
        }
    }
}

#[tokio::test(start_paused = true)]
async fn events_stream_current_state_then_updates() {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string()));
    let app = create_router(Arc::clone(&state));
    state.set_duration(Some(5)).unwrap();

    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let mut frames = response.into_body().into_data_stream();

    let current = next_timer_event(&mut frames).await;
    assert_eq!(current["run_state"], "idle");
    assert_eq!(current["remaining_seconds"], 5);
    assert_eq!(current["display"], "00 : 05");

    state.start().unwrap();
    let started = next_timer_event(&mut frames).await;
    assert_eq!(started["run_state"], "running");
    assert_eq!(started["remaining_seconds"], 5);

    let ticked = next_timer_event(&mut frames).await;
    assert_eq!(ticked["run_state"], "running");
    assert_eq!(ticked["remaining_seconds"], 4);
    assert_eq!(ticked["display"], "00 : 04");
}

#[tokio::test]
async fn health_check() {
    let (status, body) = call(&app(), "GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
