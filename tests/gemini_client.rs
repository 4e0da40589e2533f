mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::png_data_url;
use rgen_vision::{
    data_url::decode_data_url, prompt::BASE_INSTRUCTIONS, server, GeminiClient, GeminiConfig,
    ImageQueryHandler, InferenceService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn candidate_response(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 300, "candidatesTokenCount": 1 }
    })
}

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::new()
            .with_credentials("test-api-key")
            .with_base_url(server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_generate_sends_image_then_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(&["42"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let image = decode_data_url(&png_data_url()).unwrap();
    let text = client_for(&mock_server)
        .generate(&image, "what is 6 * 7?")
        .await
        .unwrap();
    assert_eq!(text, "42");

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert!(!parts[0]["inlineData"]["data"].as_str().unwrap().is_empty());
    assert_eq!(parts[1]["text"], "what is 6 * 7?");
}

#[tokio::test]
async fn test_generate_joins_text_parts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_response(&["The chart shows ", "steady growth."])),
        )
        .mount(&mock_server)
        .await;

    let image = decode_data_url(&png_data_url()).unwrap();
    let text = client_for(&mock_server).generate(&image, "").await.unwrap();
    assert_eq!(text, "The chart shows steady growth.");
}

#[tokio::test]
async fn test_api_error_message_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&mock_server)
        .await;

    let image = decode_data_url(&png_data_url()).unwrap();
    let err = client_for(&mock_server)
        .generate(&image, "")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn test_blocked_prompt_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&mock_server)
        .await;

    let image = decode_data_url(&png_data_url()).unwrap();
    let err = client_for(&mock_server)
        .generate(&image, "")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn test_empty_candidate_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [] },
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .mount(&mock_server)
        .await;

    let image = decode_data_url(&png_data_url()).unwrap();
    let err = client_for(&mock_server)
        .generate(&image, "")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Gemini returned no text (finish reason: MAX_TOKENS)"
    );
}

#[actix_web::test]
async fn test_endpoint_against_mocked_gemini() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(&["42"])))
        .mount(&mock_server)
        .await;

    let service: Arc<dyn InferenceService> = Arc::new(client_for(&mock_server));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ImageQueryHandler::new(service)))
            .configure(server::configure(1024 * 1024)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/process-image")
        .set_json(json!({ "imageData": png_data_url(), "prompt": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "response": "42" }));

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["contents"][0]["parts"][1]["text"], BASE_INSTRUCTIONS);
}
