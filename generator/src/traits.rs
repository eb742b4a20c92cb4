//! Generator trait definitions for dependency injection

use async_trait::async_trait;

use shared::{ApiFailure, GenerationRequest, GenerationResponse, TokenUsage};
use crate::error::GeneratorResult;
use crate::types::{CompletionParams, ProviderDescriptor, ProviderResponse};

/// A text-generation backend
#[mockall::automock]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider and model this adapter talks to
    fn descriptor(&self) -> ProviderDescriptor;

    /// Single-shot completion of a rendered prompt
    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<ProviderResponse, ApiFailure>;

    /// Estimated USD cost of a call with the given usage
    fn cost(&self, usage: &TokenUsage) -> f64;
}

/// Work executed by the request queue for each admitted request
#[mockall::automock]
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResponse>;
}
