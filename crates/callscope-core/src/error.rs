use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Transcript cannot be empty.")]
    EmptyInput,

    #[error("Rate limit exceeded ({limit} requests per {window_secs}s). Please try again later.")]
    RateLimitExceeded { limit: usize, window_secs: u64 },

    #[error("Missing GROQ_API_KEY. Set it in your environment or .env file.")]
    MissingCredential,

    #[error("Chat completion request failed after retries: {0}")]
    UpstreamUnavailable(String),

    #[error("Unexpected chat completion response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("Failed to persist analysis: {0}")]
    Storage(String),
}

impl AnalysisError {
    /// Stable machine-readable name, surfaced as `kind` in error replies
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::EmptyInput => "empty_input",
            AnalysisError::RateLimitExceeded { .. } => "rate_limited",
            AnalysisError::MissingCredential => "missing_credential",
            AnalysisError::UpstreamUnavailable(_) => "upstream_unavailable",
            AnalysisError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            AnalysisError::Storage(_) => "storage",
        }
    }

    /// HTTP-style status for transports
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::EmptyInput => 400,
            AnalysisError::RateLimitExceeded { .. } => 429,
            AnalysisError::MissingCredential => 500,
            AnalysisError::UpstreamUnavailable(_) => 502,
            AnalysisError::MalformedUpstreamResponse(_) => 502,
            AnalysisError::Storage(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            AnalysisError::EmptyInput,
            AnalysisError::RateLimitExceeded {
                limit: 20,
                window_secs: 300,
            },
            AnalysisError::MissingCredential,
            AnalysisError::UpstreamUnavailable("timeout".to_string()),
            AnalysisError::MalformedUpstreamResponse("no choices".to_string()),
            AnalysisError::Storage("disk full".to_string()),
        ];

        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_rate_limit_message() {
        let err = AnalysisError::RateLimitExceeded {
            limit: 20,
            window_secs: 300,
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded (20 requests per 300s). Please try again later."
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AnalysisError::EmptyInput, 400),
            (
                AnalysisError::RateLimitExceeded {
                    limit: 20,
                    window_secs: 300,
                },
                429,
            ),
            (AnalysisError::MissingCredential, 500),
            (AnalysisError::UpstreamUnavailable("timeout".to_string()), 502),
            (
                AnalysisError::MalformedUpstreamResponse("no choices".to_string()),
                502,
            ),
            (AnalysisError::Storage("disk full".to_string()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.kind());
        }
    }
}
