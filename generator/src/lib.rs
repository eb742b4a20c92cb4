//! Queued AI content generation
//!
//! Requests are admitted through a bounded-concurrency queue, rendered into a
//! prompt, sent to a primary provider with a single fallback attempt, and the
//! raw completion is normalised into one or more pieces of content.

pub mod config;
pub mod core;
pub mod error;
pub mod service_impl;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::GeneratorConfig;
pub use error::{GeneratorError, GeneratorResult};
pub use service_impl::{ContentService, GenerationPipeline};
pub use services::*;
pub use traits::*;
pub use types::*;
