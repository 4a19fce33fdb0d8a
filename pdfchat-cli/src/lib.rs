//! Shared plumbing for the `ingest`, `search` and `chat` binaries.
//!
//! - [`setup`]: logging, settings and provider wiring
//! - [`console`]: the interactive question loop
//! - [`output`]: plain-text rendering of ingest and search results

pub mod console;
pub mod output;
pub mod setup;

/// The PDF read by `ingest`, relative to the working directory.
pub const DOCUMENT_PATH: &str = "document.pdf";
