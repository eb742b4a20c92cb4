//! Generator-specific data types

use std::time::Duration;
use serde::{Serialize, Deserialize};
use shared::{ProviderId, ProviderTier, TokenUsage};

/// Shape of the text a content type asks the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Several independent variations joined by a separator token
    Variations,
    /// A JSON array of short strings
    JsonList,
    /// One piece of text
    Single,
}

/// Identity of a configured adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub provider: ProviderId,
    pub model: String,
}

/// Sampling parameters for one completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    /// Caller-requested temperature; adapters may override it
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: None,
            max_tokens: 2000,
        }
    }
}

/// Provider response data
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model_used: String,
    pub response_time: Duration,
}

/// A completion together with the adapter that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCompletion {
    pub response: ProviderResponse,
    pub provider: ProviderId,
    pub tier: ProviderTier,
    /// Estimated cost in USD
    pub cost: f64,
}

/// Point-in-time view of the request queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub queue_length: usize,
    pub active_requests: usize,
    pub max_concurrent: usize,
}
