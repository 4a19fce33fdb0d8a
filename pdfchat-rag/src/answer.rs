//! Grounded question answering.
//!
//! [`AnswerEngine`] runs the query path: retrieve the top-k chunks, fold
//! them into the instruction prompt, and ask the language model. When
//! nothing is retrieved the model is not called at all.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::llm::LanguageModel;
use crate::pipeline::RagPipeline;
use crate::prompt::{REFUSAL, build_context, build_prompt};

/// The result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model's reply, verbatim.
    Grounded(String),
    /// Retrieval found nothing; renders as the fixed refusal.
    NoContext,
}

impl Answer {
    /// The text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            Answer::Grounded(text) => text,
            Answer::NoContext => REFUSAL,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Answers questions from the ingested collection.
pub struct AnswerEngine {
    pipeline: Arc<RagPipeline>,
    model: Arc<dyn LanguageModel>,
}

impl AnswerEngine {
    /// Create an engine over a pipeline and a language model.
    pub fn new(pipeline: Arc<RagPipeline>, model: Arc<dyn LanguageModel>) -> Self {
        Self { pipeline, model }
    }

    /// Answer `question` using only retrieved context.
    ///
    /// # Errors
    ///
    /// Propagates retrieval and model failures unchanged; there is no retry.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let config = self.pipeline.config();
        let results = self.pipeline.search(question, config.top_k).await?;

        let context = build_context(&results, config.max_context_chars);
        if context.trim().is_empty() {
            info!("no context retrieved, skipping model call");
            return Ok(Answer::NoContext);
        }

        let prompt = build_prompt(&context, question);
        debug!(
            model = self.model.name(),
            chunk_count = results.len(),
            context_chars = context.chars().count(),
            "calling language model"
        );

        let text = self.model.generate(&prompt).await?;
        Ok(Answer::Grounded(text))
    }
}
