//! HTTP-backed `TextGenerator` over the configured provider.
//!
//! Request shapes cover the same three providers the configuration accepts:
//! OpenAI-style chat completions, the Anthropic messages API, and a local
//! Ollama daemon. Each call is a single attempt bounded by the configured
//! timeout; expiry surfaces as a transport error like any other failure.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use tracing::debug;

use quotecraft_core::config::{LlmConfig, LlmProvider};

use crate::llm::{GenerationError, GenerationRequest, TextGenerator};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

pub struct HttpTextGenerator {
    client: reqwest::Client,
    provider: LlmProvider,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl HttpTextGenerator {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| match config.provider {
                LlmProvider::OpenAi => OPENAI_DEFAULT_BASE_URL.to_string(),
                LlmProvider::Anthropic => ANTHROPIC_DEFAULT_BASE_URL.to_string(),
                // Config validation requires an explicit base_url for ollama.
                LlmProvider::Ollama => String::new(),
            })
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            provider: config.provider,
            api_key: config.api_key.as_ref().map(|key| key.expose_secret().to_string()),
            base_url,
            model: config.model.clone(),
        })
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let payload = send_and_parse(request).await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(GenerationError::MissingContent)
    }

    async fn complete_anthropic(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model": self.model,
            "max_tokens": ANTHROPIC_MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });

        let mut request =
            self.client.post(&url).header("anthropic-version", ANTHROPIC_VERSION).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let payload = send_and_parse(request).await?;
        payload["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(GenerationError::MissingContent)
    }

    async fn complete_ollama(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let payload = send_and_parse(self.client.post(&url).json(&body)).await?;
        payload["response"].as_str().map(str::to_string).ok_or(GenerationError::MissingContent)
    }
}

async fn send_and_parse(request: reqwest::RequestBuilder) -> Result<Value, GenerationError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(GenerationError::Provider { status: status.as_u16(), message });
    }

    Ok(response.json::<Value>().await?)
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        debug!(
            event_name = "ai.generation.request",
            template_id = request.template_id,
            provider = ?self.provider,
            model = %self.model,
            "dispatching text-generation call"
        );

        match self.provider {
            LlmProvider::OpenAi => self.complete_openai(&request.prompt).await,
            LlmProvider::Anthropic => self.complete_anthropic(&request.prompt).await,
            LlmProvider::Ollama => self.complete_ollama(&request.prompt).await,
        }
    }
}
