use std::sync::Arc;

use anyhow::Result;
use callscope_config::Config;
use callscope_core::{
    AnalysisError, AnalysisRecord, AnalysisReply, AnalysisRequest, AnalysisResult,
    EXPECTED_SENTIMENTS, PromptTemplate, SizeLimiter, format_timestamp,
};
use callscope_llm::{BackoffClient, ChatCompletion, ClientConfig, GroqClient, RetryPolicy};
use callscope_security::{RateLimitConfig, RateLimiter, Redactor};
use callscope_storage::AnalysisLog;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Runs one transcript through admission, redaction, the model and the log
pub struct Analyzer {
    model: Arc<dyn ChatCompletion>,
    log: Arc<AnalysisLog>,
    redactor: Redactor,
    size_limiter: SizeLimiter,
    rate_limiter: RateLimiter,
}

impl Analyzer {
    pub fn new(model: Arc<dyn ChatCompletion>, log: Arc<AnalysisLog>) -> Self {
        Self {
            model,
            log,
            redactor: Redactor::new(),
            size_limiter: SizeLimiter::default(),
            rate_limiter: RateLimiter::default(),
        }
    }

    /// Wire the Groq client, retry policy, log and limits from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key();
        if api_key.is_none() {
            warn!("GROQ_API_KEY is not set; every analysis will fail until it is configured");
        }

        let client = GroqClient::new(ClientConfig {
            api_key,
            api_base: config.llm.api_base.clone(),
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
        })?;
        let model = Arc::new(BackoffClient::new(client, RetryPolicy::default()));
        let log = Arc::new(AnalysisLog::new(config.storage.log_path.clone()));

        Ok(Self::new(model, log)
            .with_size_limiter(SizeLimiter::new(config.limits.max_transcript_chars))
            .with_rate_limiter(RateLimiter::new(RateLimitConfig {
                max_requests: config.limits.rate_limit_max,
                window: config.rate_limit_window(),
            })))
    }

    pub fn with_size_limiter(mut self, size_limiter: SizeLimiter) -> Self {
        self.size_limiter = size_limiter;
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn log(&self) -> &Arc<AnalysisLog> {
        &self.log
    }

    /// Rate-limit the caller, then analyze
    pub async fn submit(&self, request: &AnalysisRequest) -> callscope_core::Result<AnalysisResult> {
        self.rate_limiter
            .admit(&request.client_key)
            .map_err(|e| AnalysisError::RateLimitExceeded {
                limit: e.limit,
                window_secs: e.window_secs,
            })?;

        self.analyze(&request.transcript).await
    }

    /// `submit` with every failure folded into a structured reply
    pub async fn reply(&self, request: &AnalysisRequest) -> AnalysisReply {
        let outcome = self.submit(request).await;
        if let Err(e) = &outcome {
            warn!(client = %request.client_key, kind = e.kind(), error = %e, "Analysis failed");
        }
        outcome.into()
    }

    pub async fn analyze(&self, transcript: &str) -> callscope_core::Result<AnalysisResult> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let limited = self.size_limiter.limit(transcript);
        if limited.truncated {
            info!(max_chars = self.size_limiter.max_chars(), "Transcript truncated");
        }

        // Only the redacted copy leaves the process
        let (redacted, redactions) = self.redactor.redact(&limited.text);
        for redaction in &redactions {
            debug!(kind = %redaction.kind, count = redaction.count, "Redacted PII");
        }

        let summary = self
            .model
            .complete(&PromptTemplate::SUMMARY.render(&redacted))
            .await?;
        let sentiment = self
            .model
            .complete(&PromptTemplate::SENTIMENT.render(&redacted))
            .await?;

        if !EXPECTED_SENTIMENTS.contains(&sentiment.as_str()) {
            warn!(sentiment = %sentiment, "Sentiment is not one of the expected labels; keeping it as returned");
        }

        let timestamp = format_timestamp(OffsetDateTime::now_utc())
            .map_err(|e| AnalysisError::Storage(format!("failed to format timestamp: {}", e)))?;

        let record = AnalysisRecord {
            transcript: limited.text,
            summary,
            sentiment,
            timestamp,
        };
        self.log.append(&record).await?;

        info!(
            transcript_chars = record.transcript.chars().count(),
            truncated = limited.truncated,
            sentiment = %record.sentiment,
            "Analysis completed"
        );

        Ok(record.into_result(limited.truncated))
    }
}
