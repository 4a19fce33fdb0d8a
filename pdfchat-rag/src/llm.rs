//! Language model trait for the final answer generation step.

use async_trait::async_trait;

use crate::error::Result;

/// A text-in, text-out language model.
///
/// Implementations must decode deterministically (temperature 0) and return
/// the complete response in one piece; no streaming.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `prompt`, returned verbatim.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The model identifier, for logs.
    fn name(&self) -> &str;
}
