//! Chat-completion client for callscope
//!
//! This crate provides:
//! - `ChatCompletion`, the seam the analyzer calls through
//! - `GroqClient`, one bearer-authenticated HTTP attempt per call
//! - `BackoffClient`, bounded retries with exponential delay around any client

pub mod backoff;
pub mod client;
pub mod error;

pub use backoff::{BackoffClient, RetryPolicy};
pub use client::{ChatCompletion, ClientConfig, GroqClient};
pub use error::LlmError;
