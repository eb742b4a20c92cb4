//! Generator services implementations

pub mod openai_provider;
pub mod provider_router;
pub mod request_queue;

#[cfg(test)]
pub mod tests;

pub use openai_provider::*;
pub use provider_router::*;
pub use request_queue::*;
