//! Startup wiring: logging, settings, providers and the pipeline.

use std::process::ExitCode;
use std::sync::Arc;

use pdfchat_rag::gemini::{GeminiClient, GeminiEmbeddingProvider, GeminiModel};
use pdfchat_rag::openai::{OpenAIChatModel, OpenAIClient, OpenAIEmbeddingProvider};
use pdfchat_rag::pgvector::PgVectorStore;
use pdfchat_rag::{
    EmbeddingProvider, LanguageModel, Profile, Provider, RagConfig, RagPipeline, Result, Settings,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Load `.env` (if any) and read the variables `profile` needs.
pub fn load_settings(profile: Profile) -> Result<Settings> {
    dotenvy::dotenv().ok();
    Settings::from_env(profile)
}

/// Print a fatal error on stderr and return exit code 1.
pub fn fail(error: impl std::fmt::Display) -> ExitCode {
    eprintln!("Error: {error}");
    ExitCode::from(1)
}

fn openai_client(settings: &Settings) -> Result<OpenAIClient> {
    let client = OpenAIClient::new(&settings.api_key)?;
    Ok(match &settings.openai_base_url {
        Some(url) => client.with_base_url(url),
        None => client,
    })
}

/// The embedding provider selected by `MODEL_PROVIDER`.
pub fn embedding_provider(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match settings.provider {
        Provider::Gemini => Arc::new(GeminiEmbeddingProvider::new(
            GeminiClient::new(&settings.api_key)?,
            &settings.embedding_model,
        )),
        Provider::OpenAI => Arc::new(OpenAIEmbeddingProvider::new(
            openai_client(settings)?,
            &settings.embedding_model,
        )),
    })
}

/// The language model selected by `MODEL_PROVIDER`.
///
/// # Errors
///
/// Fails with a missing-variable error if `LLM_MODEL_NAME` was not loaded.
pub fn language_model(settings: &Settings) -> Result<Arc<dyn LanguageModel>> {
    let model = settings.llm_model()?;
    Ok(match settings.provider {
        Provider::Gemini => {
            Arc::new(GeminiModel::new(GeminiClient::new(&settings.api_key)?, model))
        }
        Provider::OpenAI => Arc::new(OpenAIChatModel::new(openai_client(settings)?, model)),
    })
}

/// Connect to Postgres and assemble the pipeline over the fixed collection.
///
/// The extension, tables and collection are created if missing, so a
/// database that was never ingested into searches as empty.
pub async fn connect_pipeline(settings: &Settings) -> Result<Arc<RagPipeline>> {
    let embedder = embedding_provider(settings)?;
    let store = PgVectorStore::connect(&settings.database_url).await?;
    info!(provider = embedder.name(), "connected to vector store");

    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(embedder)
        .vector_store(Arc::new(store))
        .build()?;
    pipeline.ensure_collection().await?;

    Ok(Arc::new(pipeline))
}
