//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s. Rows are only
/// ever appended; the store assigns each row its own identifier, so adding
/// the same chunk twice stores it twice.
///
/// # Example
///
/// ```rust,ignore
/// use pdfchat_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_collection("docs").await?;
/// store.add("docs", &chunks).await?;
/// let results = store.search("docs", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn ensure_collection(&self, name: &str) -> Result<()>;

    /// Append chunks to a collection and return the assigned row IDs.
    ///
    /// Chunks must have embeddings set.
    async fn add(&self, collection: &str, chunks: &[Chunk]) -> Result<Vec<String>>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score. An empty or
    /// unknown collection yields an empty `Vec`.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of rows stored in a collection (0 if it does not exist).
    async fn count(&self, collection: &str) -> Result<usize>;
}
