//! Analysis domain model

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::AnalysisError;

/// Appended to the returned transcript when the input was cut to the size ceiling
pub const TRUNCATION_MARKER: &str = "\n[TRUNCATED]";

/// Sentiment labels the classification prompt asks for. Not enforced.
pub const EXPECTED_SENTIMENTS: [&str; 3] = ["Positive", "Neutral", "Negative"];

/// A transcript submitted for analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub transcript: String,
    /// Caller identity used only for rate limiting
    pub client_key: String,
}

impl AnalysisRequest {
    pub fn new(transcript: impl Into<String>, client_key: Option<String>) -> Self {
        Self {
            transcript: transcript.into(),
            client_key: client_key.unwrap_or_else(|| "anonymous".to_string()),
        }
    }
}

/// Outward-facing result of one completed analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub transcript: String,
    pub summary: String,
    pub sentiment: String,
    pub timestamp: String,
}

/// One row of the persisted analysis log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(rename = "Transcript")]
    pub transcript: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl AnalysisRecord {
    pub const HEADER: [&'static str; 4] = ["Transcript", "Summary", "Sentiment", "Timestamp"];

    /// Build the outward result; the marker is only ever added here, never stored
    pub fn into_result(self, truncated: bool) -> AnalysisResult {
        let mut transcript = self.transcript;
        if truncated {
            transcript.push_str(TRUNCATION_MARKER);
        }

        AnalysisResult {
            transcript,
            summary: self.summary,
            sentiment: self.sentiment,
            timestamp: self.timestamp,
        }
    }
}

/// Structured outcome handed to transports: `{"ok": true, ...}` or `{"ok": false, "error": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReply {
    pub ok: bool,
    #[serde(flatten)]
    pub result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// HTTP-style status, carried beside the body rather than in it
    #[serde(skip)]
    pub status: u16,
}

impl From<Result<AnalysisResult, AnalysisError>> for AnalysisReply {
    fn from(outcome: Result<AnalysisResult, AnalysisError>) -> Self {
        match outcome {
            Ok(result) => Self {
                ok: true,
                result: Some(result),
                error: None,
                kind: None,
                status: 200,
            },
            Err(err) => Self {
                ok: false,
                result: None,
                error: Some(err.to_string()),
                kind: Some(err.kind().to_string()),
                status: err.status_code(),
            },
        }
    }
}

/// Format as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, time::error::Format> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    at.to_offset(UtcOffset::UTC).format(format)
}
