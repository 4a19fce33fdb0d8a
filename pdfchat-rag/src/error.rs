//! Error types for the `pdfchat-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting, retrieving or answering.
///
/// An empty retrieval is not an error; it is reported as
/// [`Answer::NoContext`](crate::answer::Answer::NoContext).
#[derive(Debug, Error)]
pub enum RagError {
    /// A required environment variable is unset or empty.
    #[error("{name} is not set (add it to the environment or the .env file)")]
    MissingVariable {
        /// The name of the missing variable.
        name: &'static str,
    },

    /// A configuration value failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source document does not exist.
    #[error("File '{path}' not found")]
    SourceNotFound {
        /// The path that was looked up.
        path: String,
    },

    /// Text could not be extracted from the source document.
    #[error("Failed to load '{path}': {message}")]
    LoaderError {
        /// The path of the document being loaded.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The language model call failed or returned an unusable response.
    #[error("Model error ({provider}): {message}")]
    ModelError {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in the ingest or query pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

impl RagError {
    /// Whether this error is detected at startup, before any network call.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            RagError::MissingVariable { .. }
                | RagError::ConfigError(_)
                | RagError::SourceNotFound { .. }
        )
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_names_the_variable() {
        let err = RagError::MissingVariable { name: "API_KEY" };
        assert!(err.to_string().starts_with("API_KEY is not set"));
        assert!(err.is_startup());
    }

    #[test]
    fn runtime_errors_are_not_startup_errors() {
        let err = RagError::EmbeddingError { provider: "Gemini".into(), message: "429".into() };
        assert!(!err.is_startup());
        assert_eq!(err.to_string(), "Embedding error (Gemini): 429");
    }
}
