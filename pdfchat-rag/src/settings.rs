//! Process-wide settings sourced from the environment.
//!
//! [`Settings`] is built once at startup and passed by reference to every
//! component. Which variables are required depends on the entry point, see
//! [`Profile`].

use std::fmt;

use crate::error::{RagError, Result};

/// Model credential.
pub const API_KEY: &str = "API_KEY";
/// Embedding model identifier.
pub const EMBEDDING_MODEL_NAME: &str = "EMBEDDING_MODEL_NAME";
/// Language model identifier.
pub const LLM_MODEL_NAME: &str = "LLM_MODEL_NAME";
/// Vector store connection string.
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Optional provider selector (`gemini` or `openai`).
pub const MODEL_PROVIDER: &str = "MODEL_PROVIDER";
/// Optional base URL for OpenAI-compatible APIs.
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// The entry point settings are loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// PDF ingestion; no language model is called.
    Ingest,
    /// One-shot similarity search; no language model is called.
    Search,
    /// Interactive question answering.
    Chat,
}

impl Profile {
    fn needs_llm(self) -> bool {
        matches!(self, Profile::Chat)
    }
}

/// The external service family used for embeddings and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Google Gemini API.
    #[default]
    Gemini,
    /// OpenAI or an OpenAI-compatible API.
    OpenAI,
}

impl Provider {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            other => Err(RagError::ConfigError(format!(
                "{MODEL_PROVIDER} must be 'gemini' or 'openai', got '{other}'"
            ))),
        }
    }
}

/// Immutable process configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Credential for the model provider.
    pub api_key: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Language model identifier; `None` unless the profile needs it.
    pub llm_model: Option<String>,
    /// Vector store connection string.
    pub database_url: String,
    /// Provider serving both models.
    pub provider: Provider,
    /// Base URL override for OpenAI-compatible providers.
    pub openai_base_url: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingVariable`] naming the first required
    /// variable that is unset or empty.
    pub fn from_env(profile: Profile) -> Result<Self> {
        Self::from_lookup(profile, |name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Required variables are checked in a fixed order: `API_KEY`,
    /// `EMBEDDING_MODEL_NAME`, `LLM_MODEL_NAME` (chat only), `DATABASE_URL`.
    pub fn from_lookup<F>(profile: Profile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(RagError::MissingVariable { name })
        };

        let api_key = required(API_KEY)?;
        let embedding_model = required(EMBEDDING_MODEL_NAME)?;
        let llm_model = if profile.needs_llm() { Some(required(LLM_MODEL_NAME)?) } else { None };
        let database_url = required(DATABASE_URL)?;

        let provider = Provider::parse(&lookup(MODEL_PROVIDER).unwrap_or_default())?;
        let openai_base_url = lookup(OPENAI_BASE_URL).filter(|v| !v.trim().is_empty());

        Ok(Self { api_key, embedding_model, llm_model, database_url, provider, openai_base_url })
    }

    /// The language model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingVariable`] when settings were loaded for a
    /// profile that does not require a language model.
    pub fn llm_model(&self) -> Result<&str> {
        self.llm_model.as_deref().ok_or(RagError::MissingVariable { name: LLM_MODEL_NAME })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("embedding_model", &self.embedding_model)
            .field("llm_model", &self.llm_model)
            .field("database_url", &"<redacted>")
            .field("provider", &self.provider)
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}
