//! Admission control and PII redaction
//!
//! - `redactor`: pattern-based PII removal for text leaving the process
//! - `rate_limit`: per-client sliding-window admission gate

pub mod rate_limit;
pub mod redactor;

pub use rate_limit::{RateLimitConfig, RateLimitExceeded, RateLimiter};
pub use redactor::{PiiKind, RedactionInfo, Redactor};
