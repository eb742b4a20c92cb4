//! End-to-end tests of ContentService against a mock OpenAI endpoint

mod fixtures;

use std::time::Duration;

use futures_util::future::join_all;
use wiremock::{MockServer, ResponseTemplate};

use fixtures::*;
use generator::{ContentService, GeneratorConfig, GeneratorError};
use shared::{ApiFailure, ContentType, Customization, GenerationProfile, GenerationRequest, ProviderId, ProviderTier};

#[tokio::test]
async fn test_primary_success_returns_six_variations() {
    let server = MockServer::start().await;
    mount_model(&server, "gpt-4", ok_with(&six_variations(), "gpt-4")).await;

    let service = service_for(&server);
    let response = service
        .generate_content(
            ContentType::LinkedinPost,
            "async standups",
            ProviderId::OpenAI,
            Customization::default(),
            Some("user-1"),
        )
        .await
        .unwrap();

    assert!(response.is_success());
    let variations = response.content().as_slice();
    assert_eq!(variations.len(), 6);
    assert_eq!(variations[0], "Post body number 1");
    assert_eq!(variations[5], "Post body number 6");

    let metadata = response.metadata();
    assert_eq!(metadata.tier, Some(ProviderTier::Primary));
    assert_eq!(metadata.model, "gpt-4");
    assert_eq!(metadata.tokens_used, 500);
    // 200 prompt tokens at 0.03/1K plus 300 completion tokens at 0.06/1K
    assert!((metadata.cost - 0.024).abs() < 1e-9);
}

#[tokio::test]
async fn test_fallback_model_answers_when_primary_errors() {
    let server = MockServer::start().await;
    mount_model(&server, "gpt-4", ResponseTemplate::new(503)).await;
    mount_model(&server, "gpt-3.5-turbo", ok_with(&six_variations(), "gpt-3.5-turbo")).await;

    let service = service_for(&server);
    let response = service
        .generate_content(ContentType::Tips, "deep work", ProviderId::OpenAI, Customization::default(), None)
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.metadata().tier, Some(ProviderTier::Fallback));
    assert_eq!(response.metadata().model, "gpt-3.5-turbo");
    // 500 tokens at the blended 0.002/1K rate
    assert!((response.metadata().cost - 0.001).abs() < 1e-9);
}

#[tokio::test]
async fn test_both_models_failing_rejects_the_request() {
    let server = MockServer::start().await;
    mount_model(&server, "gpt-4", ResponseTemplate::new(429)).await;
    mount_model(&server, "gpt-3.5-turbo", ResponseTemplate::new(500)).await;

    let service = service_for(&server);
    let error = service
        .generate_content(ContentType::Article, "pricing", ProviderId::OpenAI, Customization::default(), None)
        .await
        .unwrap_err();

    match &error {
        GeneratorError::AllProvidersFailed { primary, fallback } => {
            assert_eq!(primary, &ApiFailure::RateLimitExceeded);
            assert!(matches!(fallback, ApiFailure::ServerError(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!error.to_string().is_empty());
    assert_eq!(service.queue_status().active_requests, 0);
}

#[tokio::test]
async fn test_missing_key_fails_both_tiers_without_http_calls() {
    let server = MockServer::start().await;

    let config = GeneratorConfig::default().with_base_url(server.uri());
    let service = ContentService::from_config(&config).unwrap();

    let error = service
        .generate_content(ContentType::Quote, "grit", ProviderId::OpenAI, Customization::default(), None)
        .await
        .unwrap_err();

    assert_eq!(
        error,
        GeneratorError::AllProvidersFailed {
            primary: ApiFailure::MissingCredential,
            fallback: ApiFailure::MissingCredential,
        }
    );
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_topics_are_parsed_from_json() {
    let server = MockServer::start().await;
    let topics = r#"Sure! ["Why your first hire should be a generalist","Three signs your roadmap is too long"]"#;
    mount_model(&server, "gpt-4", ok_with(topics, "gpt-4")).await;

    let service = service_for(&server);
    let response = service
        .generate_content(ContentType::Topics, "startups", ProviderId::OpenAI, Customization::default(), None)
        .await
        .unwrap();

    assert_eq!(
        response.into_content().into_vec(),
        vec![
            "Why your first hire should be a generalist",
            "Three signs your roadmap is too long"
        ]
    );
}

#[tokio::test]
async fn test_prompt_sent_upstream_contains_customization() {
    let server = MockServer::start().await;
    mount_model(&server, "gpt-4", ok_with(&six_variations(), "gpt-4")).await;

    let service = service_for(&server);
    let profile = GenerationProfile {
        word_count: Some(150),
        target_audience: Some("engineering managers".to_string()),
        ..GenerationProfile::default()
    };
    service
        .generate_content(
            ContentType::LinkedinPost,
            "code review culture",
            ProviderId::OpenAI,
            Customization::new(profile),
            None,
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();

    assert!(prompt.contains("code review culture"));
    assert!(prompt.contains("approximately 150 words"));
    assert!(prompt.contains("engineering managers"));
    assert!(prompt.contains("---POST_SEPARATOR---"));
    assert_eq!(body["max_tokens"], 2000);
}

#[tokio::test]
async fn test_burst_is_admitted_three_at_a_time() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);
    mount_model(&server, "gpt-4", slow_ok_with(&six_variations(), "gpt-4", delay)).await;

    let service = service_for(&server);
    let handles: Vec<_> = (0..6)
        .map(|i| {
            service.submit(GenerationRequest::new(
                ContentType::LinkedinPost,
                format!("topic {i}"),
                ProviderId::OpenAI,
                Customization::default(),
            ))
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let status = service.queue_status();
    assert_eq!(status.active_requests, 3);
    assert_eq!(status.queue_length, 3);

    let results = join_all(handles).await;
    assert!(results.iter().all(|result| result.as_ref().is_ok_and(|response| response.is_success())));

    let status = service.queue_status();
    assert_eq!(status.active_requests, 0);
    assert_eq!(status.queue_length, 0);
}

#[tokio::test]
async fn test_clear_queue_rejects_waiting_requests() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(200);
    mount_model(&server, "gpt-4", slow_ok_with(&six_variations(), "gpt-4", delay)).await;

    let config = config_for(&server).with_max_concurrent(1);
    let service = ContentService::from_config(&config).unwrap();

    let request = |topic: &str| {
        GenerationRequest::new(ContentType::Story, topic, ProviderId::OpenAI, Customization::default())
    };
    let running = service.submit(request("running"));
    let waiting = service.submit(request("waiting"));

    assert_eq!(service.clear_queue(), 1);
    assert_eq!(waiting.await.unwrap_err(), GeneratorError::QueueCleared);
    assert!(running.await.unwrap().is_success());
}
