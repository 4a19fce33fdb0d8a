//! Document chunking.
//!
//! [`RecursiveChunker`] splits page text into overlapping windows measured in
//! characters. It tries a priority-ordered list of separators (paragraphs,
//! lines, sentences, words, characters) so chunk boundaries land on the
//! coarsest boundary that still keeps chunks within the size bound.

use std::ops::Range;

use crate::config::RagConfig;
use crate::document::{Chunk, Document};

/// Separators tried in order: paragraph, line, sentence, word, character.
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Recursive character splitter with a sliding overlap window.
///
/// Lengths are counted in `char`s, never bytes, so multi-byte text is never
/// cut inside a code point.
///
/// # Example
///
/// ```rust
/// use pdfchat_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(20, 5);
/// let chunks = chunker.split_text("one two three four five six seven");
/// assert!(chunks.iter().all(|c| c.chars().count() <= 20));
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker` with the default separators.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk
    /// * `chunk_overlap`: number of characters carried over between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a chunker from the size and overlap in a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Replace the separator hierarchy.
    ///
    /// Without a trailing `""` separator, a segment longer than `chunk_size`
    /// that contains none of the separators is emitted as-is.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Split raw text into trimmed, non-empty chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        self.collect_pieces(text, 0..text.len(), &self.separators, &mut pieces);
        self.merge(text, &pieces)
    }

    /// Longest piece that still fits in a chunk next to a full overlap.
    fn piece_limit(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }

    /// Break `text[range]` into contiguous byte ranges no longer than
    /// [`piece_limit`](Self::piece_limit), cutting at the coarsest separator
    /// that gets there.
    fn collect_pieces(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[String],
        pieces: &mut Vec<Range<usize>>,
    ) {
        let segment = &text[range.clone()];

        // Coarsest separator present in the segment; "" always matches.
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if segment.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let parts = if separator.is_empty() {
            split_chars(segment)
        } else {
            split_keeping_separator(segment, separator)
        };

        let mut offset = range.start;
        for part in parts {
            let part_range = offset..offset + part.len();
            offset = part_range.end;

            if char_len(part) <= self.piece_limit() || remaining.is_empty() {
                pieces.push(part_range);
            } else {
                self.collect_pieces(text, part_range, remaining, pieces);
            }
        }
    }

    /// Greedily pack contiguous pieces into windows of at most `chunk_size`
    /// characters. Each new window starts with up to `chunk_overlap`
    /// trailing characters of the previous one, beginning at a word.
    fn merge(&self, text: &str, pieces: &[Range<usize>]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut start = pieces.first().map_or(0, |p| p.start);
        let mut end = start;
        let mut total = 0;
        // Whether the window holds text not yet emitted.
        let mut fresh = false;

        for piece in pieces {
            let content = &text[piece.clone()];
            let len = char_len(content);

            if total + len > self.chunk_size {
                if fresh {
                    push_trimmed(&mut chunks, &text[start..end]);
                    fresh = false;
                }
                let budget = self.chunk_overlap.min(self.chunk_size.saturating_sub(len));
                start = overlap_start(text, start..end, budget);
                total = char_len(&text[start..end]);
            }

            end = piece.end;
            total += len;
            fresh |= !content.trim().is_empty();
        }

        if fresh {
            push_trimmed(&mut chunks, &text[start..end]);
        }

        chunks
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        self.split_text(&document.text)
            .into_iter()
            .map(|text| Chunk { text, metadata: document.metadata.clone(), embedding: Vec::new() })
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Start of the longest suffix of `text[window]` holding at most `budget`
/// characters, moved forward to the next word when it would begin mid-word.
fn overlap_start(text: &str, window: Range<usize>, budget: usize) -> usize {
    if budget == 0 {
        return window.end;
    }

    let region = &text[window.clone()];
    let cut = region.char_indices().rev().nth(budget - 1).map_or(0, |(i, _)| i);
    if cut == 0 || region[..cut].ends_with(char::is_whitespace) {
        return window.start + cut;
    }

    let tail = &region[cut..];
    let word = tail
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&i| !tail[i..].trim().is_empty());

    window.start + cut + word.unwrap_or(0)
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split text into one slice per `char`.
fn split_chars(text: &str) -> Vec<&str> {
    text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
}

/// Split text at a separator while keeping the separator attached to the preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}
