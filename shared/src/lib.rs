//! Shared types for the content generation service
//!
//! Contains the data model handed between callers and the generation
//! service: identifiers, customization profiles, request/response messages,
//! the shared error type and logging setup.

pub mod types;
pub mod errors;
pub mod customization;
pub mod messages;
pub mod logging;

pub use types::*;
pub use errors::*;
pub use customization::*;

pub use messages::{
    GeneratedContent, GenerationRequest, GenerationResponse, ResponseMetadata, ResponseStatus,
};
