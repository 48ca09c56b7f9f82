use crate::app::ports::PrimaryNormalizerPort;
use crate::config::LlmConfig;
use crate::constants::{NORMALIZATION_PROMPT, RAW_ORDERS_PLACEHOLDER};
use crate::error::NormalizerError;
use crate::types::RawOrder;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, error};

/// Primary normalizer backed by an OpenAI-compatible chat completions API
/// (OpenRouter by default).
pub struct OpenRouterNormalizer {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenRouterNormalizer {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    fn completions_url(&self) -> String {
        if self.config.base_url.ends_with('/') {
            format!("{}chat/completions", self.config.base_url)
        } else {
            format!("{}/chat/completions", self.config.base_url)
        }
    }
}

/// One order per line, spliced into the fixed normalization prompt.
pub fn build_prompt(raw_orders: &[RawOrder]) -> String {
    NORMALIZATION_PROMPT.replace(RAW_ORDERS_PLACEHOLDER, &raw_orders.join("\n"))
}

#[async_trait]
impl PrimaryNormalizerPort for OpenRouterNormalizer {
    async fn normalize(&self, raw_orders: &[RawOrder]) -> Result<String, NormalizerError> {
        if raw_orders.is_empty() {
            return Ok("[]".to_string());
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(NormalizerError::Unauthorized { status: 401 })?;

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": build_prompt(raw_orders)
                }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        debug!(model = %self.config.model, orders = raw_orders.len(), "Requesting normalization");
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.http_referer)
            .header("X-Title", &self.config.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("LLM normalization failed: {}", e);
                NormalizerError::from(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NormalizerError::Unauthorized { status: status.as_u16() });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("LLM normalization failed with status {}", status);
            return Err(NormalizerError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NormalizerError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| NormalizerError::InvalidResponse("missing choices[0].message.content".to_string()))
    }
}
