use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::error::{AgentError, Result};

/// Process-wide settings, read once at startup and treated as immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub order_api: OrderApiConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub http_referer: String,
    pub app_title: String,
}

// Hand-written so the credential never reaches a log line
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            http_referer: DEFAULT_HTTP_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderApiConfig {
    pub base_url: String,
    pub fetch_limit: usize,
}

impl Default for OrderApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORDER_API_BASE_URL.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }
}

/// Timeout and retry policy around the primary normalizer call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    /// Use the fallback normalizer once retryable failures run out of attempts.
    pub fallback_on_exhausted: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PRIMARY_TIMEOUT_SECS,
            max_retries: DEFAULT_PRIMARY_MAX_RETRIES,
            backoff_ms: DEFAULT_PRIMARY_BACKOFF_MS,
            fallback_on_exhausted: true,
        }
    }
}

impl ResilienceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry number `attempt` (1-based): base, 2x base, 4x base, ...
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

impl Config {
    /// Loads `.env`, an optional TOML file, then environment overrides, and
    /// fails if no model credentials are configured.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = std::env::var("ORDER_AGENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file_if_exists(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.require_credentials()?;
        Ok(config)
    }

    pub fn from_file_if_exists(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `KEY=value` overrides from `lookup` (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENROUTER_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = lookup("OPENROUTER_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("OPENROUTER_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("ORDER_API_BASE_URL") {
            self.order_api.base_url = v;
        }
        if let Some(v) = lookup("ORDER_FETCH_LIMIT") {
            self.order_api.fetch_limit = parse_override("ORDER_FETCH_LIMIT", &v)?;
        }
        if let Some(v) = lookup("PRIMARY_TIMEOUT_SECS") {
            self.resilience.timeout_secs = parse_override("PRIMARY_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("PRIMARY_MAX_RETRIES") {
            self.resilience.max_retries = parse_override("PRIMARY_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("PRIMARY_BACKOFF_MS") {
            self.resilience.backoff_ms = parse_override("PRIMARY_BACKOFF_MS", &v)?;
        }
        if let Some(v) = lookup("FALLBACK_ON_EXHAUSTED") {
            self.resilience.fallback_on_exhausted = parse_override("FALLBACK_ON_EXHAUSTED", &v)?;
        }
        Ok(())
    }

    /// Missing credentials are a startup failure, never a per-request one.
    pub fn require_credentials(&self) -> Result<()> {
        match self.llm.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(AgentError::Config(
                "OPENROUTER_API_KEY not set in environment".to_string(),
            )),
        }
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AgentError::Config(format!("Invalid value for {}: '{}'", key, value)))
}
