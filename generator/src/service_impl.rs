//! Content service composed from the queue, router, prompt builder and parser

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use shared::{
    ContentType, Customization, GenerationRequest, GenerationResponse, Priority, ProviderId, ResponseMetadata,
};
use crate::config::{GeneratorConfig, API_KEY_VAR, DEFAULT_MAX_TOKENS};
use crate::core::parser::ResponseParser;
use crate::core::prompt::{build_prompt, template_for};
use crate::error::GeneratorResult;
use crate::services::openai_provider::OpenAiProvider;
use crate::services::provider_router::FallbackRouter;
use crate::services::request_queue::{RequestQueue, ResponseHandle};
use crate::traits::{CompletionProvider, RequestHandler};
use crate::types::{CompletionParams, QueueStatus};

/// Prompt → provider → parser for one admitted request
pub struct GenerationPipeline<P, F>
where
    P: CompletionProvider,
    F: CompletionProvider,
{
    router: FallbackRouter<P, F>,
    parser: ResponseParser,
    default_max_tokens: u32,
}

impl<P, F> GenerationPipeline<P, F>
where
    P: CompletionProvider,
    F: CompletionProvider,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            router: FallbackRouter::new(primary, fallback),
            parser: ResponseParser::new(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Token bound used when a request's profile sets none
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens.max(1);
        self
    }

    pub fn router(&self) -> &FallbackRouter<P, F> {
        &self.router
    }

    fn params_for(&self, customization: &Customization) -> CompletionParams {
        CompletionParams {
            temperature: customization.profile.temperature,
            max_tokens: customization.profile.max_tokens.unwrap_or(self.default_max_tokens),
        }
    }
}

#[async_trait]
impl<P, F> RequestHandler for GenerationPipeline<P, F>
where
    P: CompletionProvider,
    F: CompletionProvider,
{
    async fn handle(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResponse> {
        let started = Instant::now();
        let template = template_for(request.content_type);

        let prompt = build_prompt(request.content_type, &request.prompt, &request.customization);
        let params = self.params_for(&request.customization);
        debug!(
            "Built {} prompt for request {} ({} chars)",
            request.content_type,
            request.id,
            prompt.len()
        );

        let routed = self.router.complete(&prompt, &params).await?;
        let content = self.parser.parse(template.output, &routed.response.content);

        let metadata = ResponseMetadata {
            provider: Some(routed.provider),
            tier: Some(routed.tier),
            tokens_used: routed.response.usage.total(),
            model: routed.response.model_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            cost: routed.cost,
        };

        let response = GenerationResponse::success(request.id, content, metadata);
        if response.is_success() {
            info!(
                "Request {} completed via {} tier: {} items, {} tokens, ${:.4}",
                request.id,
                routed.tier,
                response.content().len(),
                response.metadata().tokens_used,
                response.metadata().cost
            );
        } else {
            warn!("Request {} produced no usable content", request.id);
        }
        Ok(response)
    }
}

/// Entry point for content generation
pub struct ContentService<P, F>
where
    P: CompletionProvider + 'static,
    F: CompletionProvider + 'static,
{
    queue: RequestQueue<GenerationPipeline<P, F>>,
}

impl<P, F> Clone for ContentService<P, F>
where
    P: CompletionProvider + 'static,
    F: CompletionProvider + 'static,
{
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<P, F> ContentService<P, F>
where
    P: CompletionProvider + 'static,
    F: CompletionProvider + 'static,
{
    pub fn new(pipeline: GenerationPipeline<P, F>, max_concurrent: usize) -> Self {
        Self {
            queue: RequestQueue::new(pipeline, max_concurrent),
        }
    }

    /// Generate content at normal priority
    pub async fn generate_content(
        &self,
        content_type: ContentType,
        prompt: impl Into<String>,
        provider: ProviderId,
        customization: Customization,
        user_id: Option<&str>,
    ) -> GeneratorResult<GenerationResponse> {
        self.generate_with_priority(content_type, prompt, provider, customization, user_id, Priority::Normal)
            .await
    }

    pub async fn generate_with_priority(
        &self,
        content_type: ContentType,
        prompt: impl Into<String>,
        provider: ProviderId,
        customization: Customization,
        user_id: Option<&str>,
        priority: Priority,
    ) -> GeneratorResult<GenerationResponse> {
        let mut request = GenerationRequest::new(content_type, prompt, provider, customization).with_priority(priority);
        if let Some(user_id) = user_id {
            request = request.with_user(user_id);
        }
        self.submit(request).await
    }

    /// Enqueue a prepared request without waiting for it
    pub fn submit(&self, request: GenerationRequest) -> ResponseHandle {
        self.queue.submit(request)
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.queue.status()
    }

    /// Reject all requests that have not started yet
    pub fn clear_queue(&self) -> usize {
        self.queue.clear()
    }

    pub fn pipeline(&self) -> &GenerationPipeline<P, F> {
        self.queue.handler()
    }
}

impl ContentService<OpenAiProvider, OpenAiProvider> {
    /// OpenAI primary and fallback adapters sharing one HTTP client and key
    pub fn from_config(config: &GeneratorConfig) -> GeneratorResult<Self> {
        config.validate()?;

        if !config.has_api_key() {
            warn!("{} is not set; provider calls will fail with a missing credential", API_KEY_VAR);
        }

        let client = config.http_client()?;
        let primary = OpenAiProvider::primary(client.clone(), config.api_key.clone())
            .with_base_url(config.base_url.as_str())
            .with_model(config.primary_model.as_str());
        let fallback = OpenAiProvider::fallback(client, config.api_key.clone())
            .with_base_url(config.base_url.as_str())
            .with_model(config.fallback_model.as_str());

        info!(
            "Content service ready: primary={}, fallback={}, max_concurrent={}",
            config.primary_model, config.fallback_model, config.max_concurrent
        );

        let pipeline = GenerationPipeline::new(primary, fallback).with_default_max_tokens(config.default_max_tokens);
        Ok(Self::new(pipeline, config.max_concurrent))
    }
}
