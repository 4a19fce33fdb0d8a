//! # pdfchat-rag
//!
//! Retrieval-augmented question answering over a PDF.
//!
//! ## Overview
//!
//! - **Ingest**: [`PdfLoader`] reads one [`Document`] per page, the
//!   [`RecursiveChunker`] splits pages into overlapping chunks, and
//!   [`RagPipeline::ingest`] embeds and stores them.
//! - **Query**: [`AnswerEngine::answer`] retrieves the top-k chunks, builds a
//!   grounded prompt and calls a [`LanguageModel`] at temperature 0.
//!
//! Embedding providers, vector stores and language models are traits, so
//! backends swap without touching the orchestration.
//!
//! ## Features
//!
//! - `gemini`: Gemini embeddings and generation
//! - `openai`: OpenAI-compatible embeddings and chat completions
//! - `pgvector`: PostgreSQL + pgvector store
//! - `pdf`: PDF text extraction

pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod settings;
pub mod vectorstore;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "pdf")]
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use answer::{Answer, AnswerEngine};
pub use chunking::{Chunker, RecursiveChunker};
pub use config::{COLLECTION_NAME, RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult, SourceMetadata};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use llm::LanguageModel;
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
pub use pipeline::{IngestReport, RagPipeline, RagPipelineBuilder};
pub use prompt::REFUSAL;
pub use settings::{Profile, Provider, Settings};
pub use vectorstore::VectorStore;
