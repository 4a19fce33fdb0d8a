//! Property tests for in-memory vector store search ordering.

use pdfchat_rag::document::{Chunk, SourceMetadata};
use pdfchat_rag::inmemory::InMemoryVectorStore;
use pdfchat_rag::vectorstore::VectorStore;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z ]{5,30}", 0usize..10, arb_normalized_embedding(dim)).prop_map(
        |(text, page, embedding)| Chunk {
            text,
            metadata: SourceMetadata { source: "document.pdf".into(), page, total_pages: 10 },
            embedding,
        },
    )
}

/// *For any* set of chunks stored in an InMemoryVectorStore, searching with a
/// query embedding returns results ordered by descending cosine similarity,
/// and the number of results is at most top_k.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.ensure_collection("test").await.unwrap();
                store.add("test", &chunks).await.unwrap();
                store.search("test", &query, top_k).await.unwrap()
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(chunks.len()));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}
