//! Generator configuration

use std::env;
use std::time::Duration;

use crate::error::{GeneratorError, GeneratorResult};
use crate::services::openai_provider::{DEFAULT_BASE_URL, FALLBACK_MODEL, PRIMARY_MODEL};
use crate::services::request_queue::DEFAULT_MAX_CONCURRENT;

/// Environment variable holding the credential shared by both provider tiers
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Settings for building a `ContentService`
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub max_concurrent: usize,
    pub default_max_tokens: u32,
    /// Per-call HTTP timeout; none by default
    pub request_timeout: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            primary_model: PRIMARY_MODEL.to_string(),
            fallback_model: FALLBACK_MODEL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            default_max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: None,
        }
    }
}

impl GeneratorConfig {
    /// Defaults plus the credential from the process environment.
    ///
    /// A missing or blank key is not an error here; provider calls fail with
    /// `MissingCredential` instead, so the service can still be constructed.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_VAR).ok().filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> GeneratorResult<()> {
        if self.max_concurrent == 0 {
            return Err(config_error("max_concurrent must be at least 1"));
        }
        if self.default_max_tokens == 0 {
            return Err(config_error("default_max_tokens must be at least 1"));
        }
        if self.base_url.trim().is_empty() {
            return Err(config_error("base_url must not be empty"));
        }
        if self.primary_model.trim().is_empty() || self.fallback_model.trim().is_empty() {
            return Err(config_error("model names must not be empty"));
        }
        if self.request_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(config_error("request_timeout must be greater than zero"));
        }
        Ok(())
    }

    /// HTTP client shared by both adapters
    pub fn http_client(&self) -> GeneratorResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| GeneratorError::Config {
            message: format!("Failed to build HTTP client: {e}"),
        })
    }
}

fn config_error(message: &str) -> GeneratorError {
    GeneratorError::Config {
        message: message.to_string(),
    }
}
