//! Plain-text rendering for the `ingest` and `search` commands.

use pdfchat_rag::{IngestReport, SearchResult};

/// Characters of chunk content shown per search result.
pub const PREVIEW_CHARS: usize = 200;

/// Render one search hit. `rank` starts at 1.
pub fn format_search_result(rank: usize, result: &SearchResult) -> String {
    let preview: String = result.chunk.text.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if result.chunk.text.chars().count() > PREVIEW_CHARS { "..." } else { "" };
    let metadata = serde_json::to_string(&result.chunk.metadata).unwrap_or_default();

    format!(
        "Result {rank} (Score: {score:.4})\nContent: {preview}{ellipsis}\nMetadata: {metadata}\n",
        score = result.score,
    )
}

/// Render the one-line summary printed after a successful ingest.
pub fn format_ingest_report(report: &IngestReport) -> String {
    format!(
        "Ingested {} pages as {} chunks into the '{}' collection.",
        report.page_count,
        report.chunk_count,
        pdfchat_rag::COLLECTION_NAME,
    )
}
