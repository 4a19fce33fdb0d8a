//! Data types for pages, chunks, and search results.

use serde::{Deserialize, Serialize};

/// Where a piece of text came from.
///
/// Serialized as the row metadata blob in the vector store, so the field
/// names match what other tools reading the same collection expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceMetadata {
    /// Path of the source file as given to the loader.
    pub source: String,
    /// Zero-based page index within the source file.
    pub page: usize,
    /// Number of pages in the source file.
    #[serde(default)]
    pub total_pages: usize,
}

/// A single page of a source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The extracted text of the page.
    pub text: String,
    /// Source path and page position.
    pub metadata: SourceMetadata,
}

impl Document {
    /// Create a page document.
    pub fn new(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self { text: text.into(), metadata }
    }
}

/// A bounded span of a [`Document`], the unit of embedding and retrieval.
///
/// Chunks carry no identifier of their own; the vector store assigns row IDs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Metadata inherited from the parent page.
    pub metadata: SourceMetadata,
    /// The vector embedding for this chunk's text. Empty until embedded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
