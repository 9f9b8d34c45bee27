use callscope_core::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: usize, last: Box<LlmError> },
}

impl LlmError {
    /// Network-level failures: connection errors, timeouts, non-2xx statuses
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Transport(_) | LlmError::Status { .. })
    }
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AnalysisError::MissingCredential,
            LlmError::Malformed(msg) => AnalysisError::MalformedUpstreamResponse(msg),
            LlmError::Exhausted { last, .. } => AnalysisError::UpstreamUnavailable(last.to_string()),
            other => AnalysisError::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let status = LlmError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(status.is_retryable());
        assert!(!LlmError::MissingCredential.is_retryable());
        assert!(!LlmError::Malformed("no choices".to_string()).is_retryable());
    }

    #[test]
    fn test_exhausted_maps_to_last_cause() {
        let err = LlmError::Exhausted {
            attempts: 4,
            last: Box::new(LlmError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        };

        assert_eq!(
            AnalysisError::from(err),
            AnalysisError::UpstreamUnavailable("HTTP 502: bad gateway".to_string())
        );
    }

    #[test]
    fn test_credential_and_shape_mapping() {
        assert_eq!(
            AnalysisError::from(LlmError::MissingCredential),
            AnalysisError::MissingCredential
        );
        assert_eq!(
            AnalysisError::from(LlmError::Malformed("empty choices".to_string())),
            AnalysisError::MalformedUpstreamResponse("empty choices".to_string())
        );
    }
}
