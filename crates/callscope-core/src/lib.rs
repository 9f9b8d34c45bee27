//! Core domain models and logic for callscope
//!
//! This crate contains:
//! - Domain models (AnalysisRequest, AnalysisResult, AnalysisRecord)
//! - The error taxonomy shared by every transport
//! - Size limiting and prompt templates

pub mod analysis;
pub mod error;
pub mod limits;
pub mod prompt;

pub use analysis::{
    AnalysisRecord, AnalysisReply, AnalysisRequest, AnalysisResult, EXPECTED_SENTIMENTS,
    TRUNCATION_MARKER, format_timestamp,
};
pub use error::{AnalysisError, Result};
pub use limits::{DEFAULT_MAX_TRANSCRIPT_CHARS, Limited, SizeLimiter};
pub use prompt::PromptTemplate;
