//! OpenAI embedding and chat providers.
//!
//! Both talk to `/v1/embeddings` and `/v1/chat/completions` directly with
//! `reqwest`, so any OpenAI-compatible server works via
//! [`OpenAIClient::with_base_url`].
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::LanguageModel;

/// The default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Inputs sent per `/embeddings` request.
const MAX_BATCH_SIZE: usize = 100;

const PROVIDER: &str = "OpenAI";

/// Authenticated HTTP client for OpenAI-compatible APIs.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("OpenAI API key must not be empty".into()));
        }

        Ok(Self { http: reqwest::Client::new(), api_key, base_url: DEFAULT_BASE_URL.into() })
    }

    /// Use an OpenAI-compatible server instead of api.openai.com.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(format!("API returned {status}: {detail}"));
        }

        response.json().await.map_err(|e| format!("failed to parse response: {e}"))
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::openai::{OpenAIClient, OpenAIEmbeddingProvider};
///
/// let client = OpenAIClient::new("sk-...")?;
/// let provider = OpenAIEmbeddingProvider::new(client, "text-embedding-3-small");
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: OpenAIClient,
    model: String,
}

impl OpenAIEmbeddingProvider {
    /// Create a provider for the given model (e.g. `text-embedding-3-small`).
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::EmbeddingError {
            provider: PROVIDER.into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            debug!(
                provider = PROVIDER,
                batch_size = batch.len(),
                model = %self.model,
                "embedding batch"
            );

            let request = EmbeddingRequest { model: &self.model, input: batch.to_vec() };

            let response: EmbeddingResponse =
                self.client.post("embeddings", &request).await.map_err(embedding_error)?;

            if response.data.len() != batch.len() {
                return Err(embedding_error(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            let mut data = response.data;
            data.sort_by_key(|d| d.index);
            results.extend(data.into_iter().map(|d| d.embedding));
        }

        Ok(results)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

fn embedding_error(message: String) -> RagError {
    error!(provider = PROVIDER, error = %message, "embedding request failed");
    RagError::EmbeddingError { provider: PROVIDER.into(), message }
}

// ── LanguageModel implementation ───────────────────────────────────

/// A [`LanguageModel`] backed by chat completions at temperature 0.
pub struct OpenAIChatModel {
    client: OpenAIClient,
    model: String,
}

impl OpenAIChatModel {
    /// Create a chat model handle (e.g. `gpt-4o-mini`).
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = PROVIDER, model = %self.model, prompt_len = prompt.len(), "generating");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.0,
            stream: false,
        };

        let model_error = |message: String| {
            error!(provider = PROVIDER, error = %message, "chat request failed");
            RagError::ModelError { provider: PROVIDER.into(), message }
        };

        let response: ChatResponse =
            self.client.post("chat/completions", &request).await.map_err(model_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| model_error("response contained no message content".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
