//! Storage layer for callscope
//!
//! This crate provides:
//! - The append-only CSV analysis log
//! - Whole-file read back for history and download

pub mod error;
pub mod log;

pub use error::{Result, StorageError};
pub use log::{AnalysisLog, DEFAULT_LOG_FILE};
