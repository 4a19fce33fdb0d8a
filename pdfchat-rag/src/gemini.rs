//! Gemini embedding and generation over the Generative Language REST API.
//!
//! Provides [`GeminiEmbeddingProvider`] (an [`EmbeddingProvider`]) and
//! [`GeminiModel`] (a [`LanguageModel`]), both built on a shared
//! [`GeminiClient`] that talks to the API with `reqwest`.
//!
//! This module is only available when the `gemini` feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::gemini::{GeminiClient, GeminiEmbeddingProvider, GeminiModel};
//!
//! let client = GeminiClient::new("api-key")?;
//! let embedder = GeminiEmbeddingProvider::new(client.clone(), "text-embedding-004");
//! let model = GeminiModel::new(client, "gemini-2.5-flash");
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::LanguageModel;

/// The default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Maximum number of texts the API accepts in one `batchEmbedContents` call.
const MAX_BATCH_SIZE: usize = 100;

const PROVIDER: &str = "Gemini";

/// Authenticated HTTP client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("Gemini API key must not be empty".into()));
        }
        Ok(Self { http: reqwest::Client::new(), api_key, base_url: DEFAULT_BASE_URL.into() })
    }

    /// Point the client at a different base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// POST `body` to `{base}/{model}:{method}` and decode the JSON reply.
    ///
    /// Failures are returned as plain messages so each caller can wrap them
    /// in its own error variant.
    async fn call<B, R>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> std::result::Result<R, String>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{model}:{method}", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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

/// Prefix a bare model name with `models/`, leaving qualified names alone.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self { role: None, parts: vec![Part { text }] }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Serialize)]
struct BatchEmbedContentsRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct BatchEmbedContentsResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
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

/// An [`EmbeddingProvider`] backed by the Gemini embedding API.
///
/// Queries are embedded with task type `RETRIEVAL_QUERY`, document batches
/// with `RETRIEVAL_DOCUMENT`.
pub struct GeminiEmbeddingProvider {
    client: GeminiClient,
    model: String,
}

impl GeminiEmbeddingProvider {
    /// Create a provider for the given embedding model (e.g. `text-embedding-004`).
    pub fn new(client: GeminiClient, model: impl AsRef<str>) -> Self {
        Self { client, model: model_path(model.as_ref()) }
    }

    fn embedding_error(message: String) -> RagError {
        error!(provider = PROVIDER, error = %message, "embedding request failed");
        RagError::EmbeddingError { provider: PROVIDER.into(), message }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, model = %self.model, text_len = text.len(), "embedding query");

        let request = EmbedContentRequest {
            model: &self.model,
            content: Content::text(text),
            task_type: TaskType::RetrievalQuery,
        };

        let response: EmbedContentResponse = self
            .client
            .call(&self.model, "embedContent", &request)
            .await
            .map_err(Self::embedding_error)?;

        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            debug!(
                provider = PROVIDER,
                model = %self.model,
                batch_size = batch.len(),
                "embedding batch"
            );

            let request = BatchEmbedContentsRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: &self.model,
                        content: Content::text(text),
                        task_type: TaskType::RetrievalDocument,
                    })
                    .collect(),
            };

            let response: BatchEmbedContentsResponse = self
                .client
                .call(&self.model, "batchEmbedContents", &request)
                .await
                .map_err(Self::embedding_error)?;

            if response.embeddings.len() != batch.len() {
                return Err(Self::embedding_error(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            results.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(results)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

// ── LanguageModel implementation ───────────────────────────────────

/// A [`LanguageModel`] backed by Gemini `generateContent` at temperature 0.
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

impl GeminiModel {
    /// Create a model handle (e.g. `gemini-2.5-flash`).
    pub fn new(client: GeminiClient, model: impl AsRef<str>) -> Self {
        Self { client, model: model_path(model.as_ref()) }
    }

    fn model_error(message: String) -> RagError {
        error!(provider = PROVIDER, error = %message, "generation request failed");
        RagError::ModelError { provider: PROVIDER.into(), message }
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = PROVIDER, model = %self.model, prompt_len = prompt.len(), "generating");

        let request = GenerateContentRequest {
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let response: GenerateContentResponse = self
            .client
            .call(&self.model, "generateContent", &request)
            .await
            .map_err(Self::model_error)?;

        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Self::model_error(format!("prompt blocked: {reason}")));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Self::model_error("response contained no candidates".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".into());
            return Err(Self::model_error(format!("empty response (finish reason {reason})")));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
