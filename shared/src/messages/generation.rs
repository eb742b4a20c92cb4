//! Caller ↔ service messages for content generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::customization::{ContentType, Customization};
use crate::types::{Priority, ProviderId, ProviderTier, RequestId, ResponseId};

/// A single content-generation request; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub id: RequestId,
    pub content_type: ContentType,
    /// Topic, brief or draft text the content is generated from
    pub prompt: String,
    pub provider: ProviderId,
    pub customization: Customization,
    pub user_id: Option<String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl GenerationRequest {
    pub fn new(
        content_type: ContentType,
        prompt: impl Into<String>,
        provider: ProviderId,
        customization: Customization,
    ) -> Self {
        Self {
            id: RequestId::new(),
            content_type,
            prompt: prompt.into(),
            provider,
            customization,
            user_id: None,
            priority: Priority::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Generated text: one piece, or an ordered set of variations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    Single(String),
    Variations(Vec<String>),
}

impl GeneratedContent {
    pub fn is_empty(&self) -> bool {
        match self {
            GeneratedContent::Single(text) => text.trim().is_empty(),
            GeneratedContent::Variations(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Number of alternatives carried
    pub fn len(&self) -> usize {
        match self {
            GeneratedContent::Single(text) if text.trim().is_empty() => 0,
            GeneratedContent::Single(_) => 1,
            GeneratedContent::Variations(items) => items.len(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            GeneratedContent::Single(text) => std::slice::from_ref(text),
            GeneratedContent::Variations(items) => items,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            GeneratedContent::Single(text) => vec![text],
            GeneratedContent::Variations(items) => items,
        }
    }
}

impl Default for GeneratedContent {
    fn default() -> Self {
        GeneratedContent::Variations(Vec::new())
    }
}

/// Provider and usage details attached to every response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub provider: Option<ProviderId>,
    pub tier: Option<ProviderTier>,
    pub model: String,
    pub tokens_used: u32,
    pub processing_time_ms: u64,
    /// Estimated cost in USD
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Outcome of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    id: ResponseId,
    request_id: RequestId,
    content: GeneratedContent,
    metadata: ResponseMetadata,
    status: ResponseStatus,
    error: Option<String>,
    created_at: DateTime<Utc>,
}

impl GenerationResponse {
    /// Successful response. Empty content is reported as an error instead.
    pub fn success(request_id: RequestId, content: GeneratedContent, metadata: ResponseMetadata) -> Self {
        if content.is_empty() {
            return Self::failure(request_id, "provider returned no usable content", metadata);
        }

        Self {
            id: ResponseId::new(),
            request_id,
            content,
            metadata,
            status: ResponseStatus::Success,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Error response; always carries a message and no content
    pub fn failure(request_id: RequestId, error: impl Into<String>, metadata: ResponseMetadata) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "generation failed".to_string();
        }

        Self {
            id: ResponseId::new(),
            request_id,
            content: GeneratedContent::default(),
            metadata,
            status: ResponseStatus::Error,
            error: Some(error),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ResponseId {
        self.id
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn content(&self) -> &GeneratedContent {
        &self.content
    }

    pub fn into_content(self) -> GeneratedContent {
        self.content
    }

    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_empty_content_becomes_error() {
        let response = GenerationResponse::success(
            RequestId::new(),
            GeneratedContent::Variations(vec!["  ".to_string()]),
            ResponseMetadata::default(),
        );

        assert_eq!(response.status(), ResponseStatus::Error);
        assert!(response.error().is_some());
        assert_eq!(response.content().len(), 0);
    }

    #[test]
    fn test_failure_always_has_message() {
        let response = GenerationResponse::failure(RequestId::new(), "", ResponseMetadata::default());
        assert_eq!(response.error(), Some("generation failed"));
        assert!(response.content().is_empty());
    }

    #[test]
    fn test_content_serializes_untagged() {
        let single = serde_json::to_value(GeneratedContent::Single("hello".into())).unwrap();
        assert_eq!(single, serde_json::json!("hello"));

        let many = serde_json::to_value(GeneratedContent::Variations(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(many, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_response_json_uses_camel_case() {
        let response = GenerationResponse::success(
            RequestId::new(),
            GeneratedContent::Single("post".into()),
            ResponseMetadata {
                tokens_used: 42,
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["metadata"]["tokensUsed"], 42);
        assert!(json.get("requestId").is_some());
    }
}
