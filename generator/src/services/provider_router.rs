//! Primary/fallback routing over two completion providers

use tracing::{error, info, warn};

use shared::ProviderTier;
use crate::error::{GeneratorError, GeneratorResult};
use crate::traits::CompletionProvider;
use crate::types::{CompletionParams, ProviderDescriptor, RoutedCompletion};

/// Sends each prompt to the primary provider, falling back to the secondary
/// provider exactly once when the primary call fails for any reason
pub struct FallbackRouter<P, F>
where
    P: CompletionProvider,
    F: CompletionProvider,
{
    primary: P,
    fallback: F,
}

impl<P, F> FallbackRouter<P, F>
where
    P: CompletionProvider,
    F: CompletionProvider,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Complete a prompt; no retries beyond the single fallback attempt
    pub async fn complete(&self, prompt: &str, params: &CompletionParams) -> GeneratorResult<RoutedCompletion> {
        let primary = self.primary.descriptor();

        let primary_failure = match self.primary.complete(prompt, params).await {
            Ok(response) => {
                let cost = self.primary.cost(&response.usage);
                return Ok(RoutedCompletion {
                    response,
                    provider: primary.provider,
                    tier: ProviderTier::Primary,
                    cost,
                });
            }
            Err(failure) => failure,
        };

        let fallback = self.fallback.descriptor();
        warn!(
            "Primary provider {} ({}) failed: {}; falling back to {}",
            primary.provider, primary.model, primary_failure, fallback.model
        );

        match self.fallback.complete(prompt, params).await {
            Ok(response) => {
                let cost = self.fallback.cost(&response.usage);
                info!("Fallback provider {} ({}) succeeded", fallback.provider, fallback.model);
                Ok(RoutedCompletion {
                    response,
                    provider: fallback.provider,
                    tier: ProviderTier::Fallback,
                    cost,
                })
            }
            Err(fallback_failure) => {
                error!(
                    "Fallback provider {} ({}) failed: {}",
                    fallback.provider, fallback.model, fallback_failure
                );
                Err(GeneratorError::AllProvidersFailed {
                    primary: primary_failure,
                    fallback: fallback_failure,
                })
            }
        }
    }

    pub fn descriptors(&self) -> (ProviderDescriptor, ProviderDescriptor) {
        (self.primary.descriptor(), self.fallback.descriptor())
    }
}
