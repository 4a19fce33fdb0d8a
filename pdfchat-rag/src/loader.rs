//! PDF loading.
//!
//! [`PdfLoader`] extracts one [`Document`] per page using
//! [pdf-extract](https://docs.rs/pdf-extract). Whether the file exists is
//! checked by the caller; a missing file here surfaces as a loader error.
//!
//! This module is only available when the `pdf` feature is enabled.

use std::panic;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::document::{Document, SourceMetadata};
use crate::error::{RagError, Result};

/// Loads a PDF file as page-level documents.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    /// Create a loader for the PDF at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the text of every page.
    ///
    /// Pages without extractable text are kept (with empty text) so page
    /// numbers stay aligned with the source file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoaderError`] if the file cannot be read or parsed,
    /// including when the parser panics on a malformed file.
    pub fn load(&self) -> Result<Vec<Document>> {
        let source = self.path.display().to_string();

        // pdf-extract panics on some malformed files instead of returning an error.
        let path = self.path.as_path();
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path))
            .map_err(|_| "PDF parser panicked on malformed input".to_string())
            .and_then(|extracted| extracted.map_err(|e| e.to_string()))
            .map_err(|message| {
                error!(path = %source, error = %message, "pdf extraction failed");
                RagError::LoaderError { path: source.clone(), message }
            })?;

        debug!(path = %source, page_count = pages.len(), "extracted pdf pages");
        Ok(pages_to_documents(&source, pages))
    }
}

/// Wrap extracted page texts as [`Document`]s carrying source and page metadata.
pub fn pages_to_documents(source: &str, pages: Vec<String>) -> Vec<Document> {
    let total_pages = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(page, text)| {
            Document::new(text, SourceMetadata { source: source.to_string(), page, total_pages })
        })
        .collect()
}
