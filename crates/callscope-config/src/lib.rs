use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for callscope
///
/// Layered: built-in defaults, then `config.toml`, then environment variables.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Only ever read from the environment
    #[serde(skip)]
    api_key: Option<SecretString>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_transcript_chars")]
    pub max_transcript_chars: usize,

    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: usize,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_transcript_chars: default_max_transcript_chars(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_transcript_chars() -> usize {
    4000
}

fn default_rate_limit_max() -> usize {
    20
}

fn default_rate_limit_window_secs() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_path() -> PathBuf {
    PathBuf::from("call_analysis.csv")
}

impl Config {
    /// Load `.env`, the config file if present, then environment overrides
    pub fn load() -> anyhow::Result<Self> {
        env_file_loaded(dotenvy::dotenv())?;

        let path = Self::config_path();
        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Some(content)
        } else {
            None
        };

        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
            .with_context(|| format!("invalid configuration (config file: {})", path.display()))
    }

    /// Build from optional TOML text and an environment lookup
    pub fn from_sources<F>(file: Option<&str>, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match file {
            Some(content) => toml::from_str(content)?,
            None => Config::default(),
        };

        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key = env("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        if let Some(api_base) = env("GROQ_API_BASE") {
            self.llm.api_base = api_base;
        }
        if let Some(model) = env("GROQ_MODEL") {
            self.llm.model = model;
        }
        if let Some(max) = parse_env(&env, "MAX_TRANSCRIPT_CHARS")? {
            self.limits.max_transcript_chars = max;
        }
        if let Some(max) = parse_env(&env, "RATE_LIMIT_MAX")? {
            self.limits.rate_limit_max = max;
        }
        if let Some(secs) = parse_env(&env, "RATE_LIMIT_WINDOW_SEC")? {
            self.limits.rate_limit_window_secs = secs;
        }
        if let Some(host) = env("CALLSCOPE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env(&env, "PORT")? {
            self.server.port = port;
        }
        if let Some(path) = env("CALLSCOPE_LOG_PATH") {
            self.storage.log_path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CALLSCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        if let Some(dirs) = directories::ProjectDirs::from("com", "callscope", "callscope") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("callscope.toml")
        }
    }

    /// A fresh handle on the API key, if one is configured
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_string()))
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.limits.rate_limit_window_secs)
    }
}

/// A missing `.env` is normal; an unreadable or malformed one is not
fn env_file_loaded<T>(result: Result<T, dotenvy::Error>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load .env"),
    }
}

fn parse_env<T, F>(env: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} must be a number, got {:?}: {}", key, raw, e)),
        None => Ok(None),
    }
}
