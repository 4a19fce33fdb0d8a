//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the ingest path (chunk → embed → store)
//! and the retrieval path (embed query → search) by composing an
//! [`EmbeddingProvider`], a [`VectorStore`] and a [`Chunker`]. Every
//! operation targets the single [`COLLECTION_NAME`] collection.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfchat_rag::{RagPipeline, RagConfig, InMemoryVectorStore};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.ensure_collection().await?;
//! let report = pipeline.ingest(&pages).await?;
//! let results = pipeline.search("search query", 10).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::{COLLECTION_NAME, RagConfig};
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Outcome of ingesting a set of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of pages read.
    pub page_count: usize,
    /// Number of chunks produced and stored.
    pub chunk_count: usize,
    /// Row IDs assigned by the vector store, in chunk order.
    pub ids: Vec<String>,
}

/// The RAG pipeline orchestrator.
///
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// The collection every operation reads and writes.
    pub fn collection(&self) -> &'static str {
        COLLECTION_NAME
    }

    /// Create the collection in the vector store if it does not exist.
    ///
    /// # Errors
    ///
    /// Propagates the vector store's error unchanged.
    pub async fn ensure_collection(&self) -> Result<()> {
        self.vector_store.ensure_collection(COLLECTION_NAME).await.inspect_err(|e| {
            error!(collection = COLLECTION_NAME, error = %e, "failed to create collection");
        })
    }

    /// Split pages into chunks without embedding them.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|d| self.chunker.chunk(d)).collect()
    }

    /// Embed chunks and append them to the collection.
    ///
    /// Returns the row IDs the store assigned. Storing the same chunks twice
    /// stores them twice.
    ///
    /// # Errors
    ///
    /// Embedding and storage errors propagate unchanged. Returns
    /// [`RagError::PipelineError`] if the provider returns the wrong number
    /// of vectors.
    pub async fn upsert(&self, mut chunks: Vec<Chunk>) -> Result<Vec<String>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::PipelineError(format!(
                "embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.add(COLLECTION_NAME, &chunks).await.inspect_err(|e| {
            error!(collection = COLLECTION_NAME, error = %e, "upsert failed during ingestion");
        })
    }

    /// Ingest pages: chunk → embed → store.
    ///
    /// # Errors
    ///
    /// Same as [`upsert`](Self::upsert).
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let chunks = self.chunk_documents(documents);
        let chunk_count = chunks.len();
        let ids = self.upsert(chunks).await?;

        info!(page_count = documents.len(), chunk_count, "ingested documents");

        Ok(IngestReport { page_count: documents.len(), chunk_count, ids })
    }

    /// Retrieve up to `k` chunks most similar to `query`, best first.
    ///
    /// # Errors
    ///
    /// Embedding and vector store errors propagate unchanged.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;

        let results =
            self.vector_store.search(COLLECTION_NAME, &query_embedding, k).await.inspect_err(
                |e| error!(collection = COLLECTION_NAME, error = %e, "vector store search failed"),
            )?;

        info!(result_count = results.len(), "query completed");
        Ok(results)
    }

    /// Number of rows currently stored in the collection.
    ///
    /// # Errors
    ///
    /// Propagates the vector store's error unchanged.
    pub async fn count(&self) -> Result<usize> {
        self.vector_store.count(COLLECTION_NAME).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `vector_store` are required. `config` defaults to
/// [`RagConfig::default()`] and `chunker` to a [`RecursiveChunker`] sized
/// from the config.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(RecursiveChunker::from_config(&config)));

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
