//! OpenAI chat-completions adapter

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shared::{ApiFailure, ProviderId, TokenUsage};
use crate::core::cost::{Pricing, FALLBACK_PRICING, PRIMARY_PRICING};
use crate::traits::CompletionProvider;
use crate::types::{CompletionParams, ProviderDescriptor, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const PRIMARY_MODEL: &str = "gpt-4";
pub const FALLBACK_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// How an adapter chooses the sampling temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperaturePolicy {
    /// Always use this value, whatever the caller asked for
    Fixed(f32),
    /// Use the caller's value, or this one when none was given
    CallerOr(f32),
}

impl TemperaturePolicy {
    pub fn resolve(&self, requested: Option<f32>) -> f32 {
        match *self {
            TemperaturePolicy::Fixed(value) => value,
            TemperaturePolicy::CallerOr(default) => requested.unwrap_or(default),
        }
    }
}

/// Adapter for an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: TemperaturePolicy,
    pricing: Pricing,
}

impl OpenAiProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        model: impl Into<String>,
        temperature: TemperaturePolicy,
        pricing: Pricing,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            temperature,
            pricing,
        }
    }

    /// GPT-4 with a fixed temperature for consistent output
    pub fn primary(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::new(
            client,
            api_key,
            PRIMARY_MODEL,
            TemperaturePolicy::Fixed(DEFAULT_TEMPERATURE),
            PRIMARY_PRICING,
        )
    }

    /// GPT-3.5 Turbo, cheaper and faster
    pub fn fallback(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self::new(
            client,
            api_key,
            FALLBACK_MODEL,
            TemperaturePolicy::CallerOr(DEFAULT_TEMPERATURE),
            FALLBACK_PRICING,
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            provider: ProviderId::OpenAI,
            model: self.model.clone(),
        }
    }

    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<ProviderResponse, ApiFailure> {
        let api_key = self.api_key.as_deref().ok_or(ApiFailure::MissingCredential)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: self.temperature.resolve(params.temperature),
        };

        debug!(
            "Sending {} prompt chars to {} (max_tokens={}, temperature={})",
            prompt.len(),
            self.model,
            request_body.max_tokens,
            request_body.temperature
        );

        let request_start = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ApiFailure::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => ApiFailure::InvalidApiKey,
                429 => ApiFailure::RateLimitExceeded,
                503 => ApiFailure::ServiceUnavailable,
                _ => ApiFailure::ServerError(status.to_string()),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiFailure::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let response_time = request_start.elapsed();

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ApiFailure::EmptyCompletion)?;

        let usage = parsed
            .usage
            .map(|usage| TokenUsage::new(usage.prompt_tokens, usage.completion_tokens))
            .unwrap_or_default();

        Ok(ProviderResponse {
            content,
            usage,
            model_used: parsed.model.unwrap_or_else(|| self.model.clone()),
            response_time,
        })
    }

    fn cost(&self, usage: &TokenUsage) -> f64 {
        self.pricing.cost(usage)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
