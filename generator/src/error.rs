//! Generator error types

use thiserror::Error;
use shared::{ApiFailure, SharedError};

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Generator error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("All providers failed (primary: {primary}; fallback: {fallback})")]
    AllProvidersFailed { primary: ApiFailure, fallback: ApiFailure },

    #[error("Request was removed from the queue before it started (queue cleared)")]
    QueueCleared,

    #[error("Request worker stopped without producing a result")]
    Dropped,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Shared(#[from] SharedError),
}
