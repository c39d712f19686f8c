use std::sync::Arc;
use std::time::Duration;

use event_scout::{
    Category, EventController, EventFetchPipeline, EventSource, FetchConfig, FetchError, Phase,
    FETCH_FAILED_MESSAGE,
};
use httpmock::prelude::*;
use serde_json::json;

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn config_for(server: &MockServer) -> FetchConfig {
    FetchConfig::default()
        .with_endpoint(server.base_url())
        .with_api_key(Some("test-key".to_string()))
}

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn fetches_and_normalizes_fenced_events() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "test-key")
            .body_contains("\"google_search\"")
            .body_contains("Nairobi, Kenya");
        then.status(200).json_body(gemini_body(
            "```json\n[{\"title\":\"Jazz Night\",\"date\":\"2024-05-01\"},{\"date\":\"untitled\"}]\n```",
        ));
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    let events = pipeline.fetch_events("Nairobi").await?;

    mock.assert();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.title, "Jazz Night");
    assert_eq!(event.category, Category::Other);
    assert!(event.requirements.is_empty());
    assert!(event.id.starts_with("evt-Nairobi-0-"));
    assert!(event.image_url.contains("JazzNight0"));
    Ok(())
}

#[tokio::test]
async fn sends_low_temperature() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .json_body_partial(r#"{ "generationConfig": { "temperature": 0.3 } }"#);
        then.status(200).json_body(gemini_body("[]"));
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    let events = pipeline.fetch_events("Thika").await?;

    mock.assert();
    assert!(events.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_text_is_a_json_error() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_body("not json at all"));
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    let result = pipeline.fetch_events("Mombasa").await;
    assert!(matches!(result, Err(FetchError::MalformedJson(_))));
    Ok(())
}

#[tokio::test]
async fn missing_text_is_an_empty_response() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(json!({ "candidates": [] }));
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    let result = pipeline.fetch_events("Kisumu").await;
    assert!(matches!(result, Err(FetchError::EmptyResponse)));
    Ok(())
}

#[tokio::test]
async fn service_errors_are_transport_errors() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503).body("overloaded");
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    match pipeline.fetch_events("Nakuru").await {
        Err(FetchError::Transport(message)) => assert!(message.contains("503")),
        other => panic!("expected transport error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn slow_service_times_out_as_transport_error() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(gemini_body("[]"));
    });

    let config = config_for(&server).with_timeout(Duration::from_millis(50));
    let pipeline = EventFetchPipeline::new(&config)?;
    let result = pipeline.fetch_events("Eldoret").await;
    assert!(matches!(result, Err(FetchError::Transport(_))));
    Ok(())
}

#[tokio::test]
async fn missing_credential_skips_the_network() -> anyhow::Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_body("[]"));
    });

    let config = FetchConfig::default().with_endpoint(server.base_url());
    let pipeline = EventFetchPipeline::new(&config)?;
    assert!(!pipeline.is_configured());

    let events = pipeline.fetch_events("Malindi").await?;
    assert!(events.is_empty());
    assert_eq!(mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn controller_reports_failures_generically() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_body("Sorry, I could not find anything."));
    });

    let pipeline = EventFetchPipeline::new(&config_for(&server))?;
    let controller = EventController::new(Arc::new(pipeline));
    if let Some(handle) = controller.start() {
        handle.await?;
    }

    let state = controller.state();
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.error_message(), Some(FETCH_FAILED_MESSAGE));
    assert!(state.events().is_empty());
    Ok(())
}
