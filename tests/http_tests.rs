// Router tests driven through tower's oneshot, without binding a socket

mod common;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{final_slot, results, Host, MockFactory};
use live_dictation::recognition::HostEnvironment;
use live_dictation::session::UNSUPPORTED_MESSAGE;
use live_dictation::{create_router, AppState, DictationRuntime, SessionConfig, SpeechCapability};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router(capability: SpeechCapability) -> axum::Router {
    let (runtime, handle) = DictationRuntime::new(
        capability,
        SessionConfig::default(),
        HostEnvironment::new(true),
    );
    tokio::spawn(runtime.run());
    create_router(AppState::new(handle))
}

fn available_router() -> (axum::Router, Arc<Host>) {
    let (factory, host) = MockFactory::new();
    (router(SpeechCapability::available(factory)), host)
}

async fn send(router: &axum::Router, method: &str, uri: &str) -> Result<(StatusCode, Value)> {
    let response = router
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty())?)
        .await?;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, body))
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (router, _) = available_router();

    let (status, body) = send(&router, "GET", "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_toggle_starts_and_stops() -> Result<()> {
    let (router, _) = available_router();

    let (status, body) = send(&router, "POST", "/dictation/toggle").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_recording"], true);
    assert!(body["session_id"].is_string());

    let (_, body) = send(&router, "POST", "/dictation/toggle").await?;
    assert_eq!(body["is_recording"], false);
    assert!(body["session_id"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_start_without_capability_reports_error() -> Result<()> {
    let router = router(SpeechCapability::Unavailable);

    let (status, body) = send(&router, "POST", "/dictation/start").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_recording"], false);
    assert_eq!(body["error"], UNSUPPORTED_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_transcript_endpoint() -> Result<()> {
    let (router, host) = available_router();
    send(&router, "POST", "/dictation/start").await?;

    host.sink(0).emit(results(0, vec![final_slot("你好")]));

    let mut transcript = Value::Null;
    for _ in 0..100 {
        let (status, body) = send(&router, "GET", "/dictation/transcript").await?;
        assert_eq!(status, StatusCode::OK);
        transcript = body["transcript"].clone();
        if transcript == "你好" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    assert_eq!(transcript, "你好");

    let (_, body) = send(&router, "POST", "/dictation/clear").await?;
    assert_eq!(body["transcript"], "");
    Ok(())
}

#[tokio::test]
async fn test_stop_when_idle() -> Result<()> {
    let (router, host) = available_router();

    let (status, body) = send(&router, "POST", "/dictation/stop").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_recording"], false);
    assert_eq!(host.session_count(), 0);
    Ok(())
}
