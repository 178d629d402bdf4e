//! Optional remote capabilities used by the analyzer
//!
//! Both capabilities are resolved once when the analyzer is built. When one
//! is absent (disabled, or no API key in the environment) the analyzer takes
//! its local fallback path instead.

use super::AnalyzerError;
use crate::config::{EmbeddingConfig, LlmConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for calls to model endpoints
const BACKEND_TIMEOUT_SECS: u64 = 60;

/// Turns texts into fixed-size vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns one vector per input text, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AnalyzerError>;
}

/// What a generative backend is asked to describe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRequest<'a> {
    pub module_name: &'a str,
    /// Module content, already cut to the backend's limit
    pub module_content: &'a str,
    /// Corpus excerpt, already cut to the backend's limit
    pub context: &'a str,
}

impl DescriptionRequest<'_> {
    /// Renders the prompt sent to the model
    pub fn prompt(&self) -> String {
        format!(
            "Generate a concise description for the module \"{}\"\n\
             using the documentation below.\n\n\
             Module Content:\n{}\n\n\
             Context:\n{}\n\n\
             Description:\n",
            self.module_name, self.module_content, self.context
        )
    }
}

/// Writes module descriptions with a language model
#[async_trait]
pub trait DescriptionBackend: Send + Sync {
    async fn describe(&self, request: &DescriptionRequest<'_>) -> Result<String, AnalyzerError>;
}

fn read_api_key(env_var: &str) -> Option<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => {
            tracing::warn!("{} is not set; backend disabled", env_var);
            None
        }
    }
}

fn build_backend_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(BACKEND_TIMEOUT_SECS))
        .build()
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
    #[serde(default)]
    index: usize,
}

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpEmbedder {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    /// Builds an embedder when enabled and an API key is available
    pub fn from_config(config: &EmbeddingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = read_api_key(&config.api_key_env)?;
        let client = match build_backend_client() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Failed to build embedding client: {}", e);
                return None;
            }
        };
        Some(Self::new(client, &config.base_url, &config.model, api_key))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AnalyzerError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::Embedding(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let mut body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Embedding(e.to_string()))?;

        if body.data.len() != texts.len() {
            return Err(AnalyzerError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        body.data.sort_by_key(|d| d.index);
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Description backend backed by an OpenAI-compatible `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionBackend {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl ChatCompletionBackend {
    pub fn new(client: Client, base_url: &str, model: &str, temperature: f32, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            api_key,
        }
    }

    /// Builds a backend when enabled and an API key is available
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = read_api_key(&config.api_key_env)?;
        let client = match build_backend_client() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Failed to build LLM client: {}", e);
                return None;
            }
        };
        Some(Self::new(
            client,
            &config.base_url,
            &config.model,
            config.temperature,
            api_key,
        ))
    }
}

#[async_trait]
impl DescriptionBackend for ChatCompletionBackend {
    async fn describe(&self, request: &DescriptionRequest<'_>) -> Result<String, AnalyzerError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzerError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::Generation(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Generation(e.to_string()))?;

        let text = reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalyzerError::Generation("empty reply".to_string()));
        }
        Ok(text)
    }
}
