//! Message types exchanged between callers and the generation service
//!
//! - `generation`: requests, responses and generated content

pub mod generation;

pub use generation::{
    GeneratedContent, GenerationRequest, GenerationResponse, ResponseMetadata, ResponseStatus,
};
