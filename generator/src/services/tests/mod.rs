//! Tests for generator services
//!
//! Provider behaviour is exercised against mocked traits and a local
//! wiremock server; the queue runs on tokio's paused clock.

pub mod request_queue;

pub use crate::traits::*;
