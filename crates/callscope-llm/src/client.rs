//! Groq chat-completion client (OpenAI-compatible API)

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::LlmError;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in `LlmError::Status`
const MAX_ERROR_BODY_CHARS: usize = 512;

/// One logical prompt → completion call
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug)]
pub struct ClientConfig {
    pub api_key: Option<SecretString>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Single-attempt client; wrap in `BackoffClient` for retries
pub struct GroqClient {
    /// Never exposed in logs or debug output
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GroqClient {
    pub fn new(config: ClientConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("callscope/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key: config.api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let Some(api_key) = &self.api_key else {
            return Err(LlmError::MissingCredential);
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Extract `choices[0].message.content`, trimmed
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Malformed(format!("invalid chat completion envelope: {}", e)))?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| LlmError::Malformed("no content in first choice".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_choice_trimmed() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Negative\n"}},{"message":{"content":"Positive"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Negative");
    }

    #[test]
    fn test_parse_empty_choices() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_completion("<html>oops</html>").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[test]
    fn test_request_shape() {
        let client = GroqClient::new(ClientConfig::default()).unwrap();
        let json = serde_json::to_value(client.build_request("hello")).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_debug_hides_key() {
        let client = GroqClient::new(ClientConfig {
            api_key: Some(SecretString::from("gsk_live_secret".to_string())),
            ..ClientConfig::default()
        })
        .unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("gsk_live_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = GroqClient::new(ClientConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();

        let err = client.complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }
}
