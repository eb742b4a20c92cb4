//! Test fixtures and utilities

#![allow(dead_code)] // Not every test file uses every helper

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use generator::{ContentService, GeneratorConfig, OpenAiProvider};

pub const TEST_KEY: &str = "sk-integration-test";

/// OpenAI chat-completions body with the given text and usage
pub fn completion_body(content: &str, model: &str, prompt_tokens: u32, completion_tokens: u32) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

/// Six posts joined by the canonical separator
pub fn six_variations() -> String {
    (1..=6)
        .map(|i| format!("Variation {i}: Post body number {i}"))
        .collect::<Vec<_>>()
        .join("\n---POST_SEPARATOR---\n")
}

/// Mount a responder for calls that name `model`
pub async fn mount_model(server: &MockServer, model: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": model })))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn ok_with(content: &str, model: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion_body(content, model, 200, 300))
}

pub fn slow_ok_with(content: &str, model: &str, delay: Duration) -> ResponseTemplate {
    ok_with(content, model).set_delay(delay)
}

pub fn config_for(server: &MockServer) -> GeneratorConfig {
    GeneratorConfig::default()
        .with_api_key(TEST_KEY)
        .with_base_url(server.uri())
}

pub fn service_for(server: &MockServer) -> ContentService<OpenAiProvider, OpenAiProvider> {
    ContentService::from_config(&config_for(server)).expect("service should build")
}
