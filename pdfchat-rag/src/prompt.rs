//! Prompt template and context assembly.

use crate::document::SearchResult;

/// Reply used whenever the answer is not supported by the retrieved context.
pub const REFUSAL: &str = "I don't have the information necessary to answer your question.";

/// Separator placed between consecutive context chunks.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts in rank order, scores discarded.
///
/// Whole chunks are kept while they fit in `max_chars`; the first chunk that
/// would overflow is cut on a character boundary and the rest are dropped.
/// Separators count toward the budget.
pub fn build_context(results: &[SearchResult], max_chars: usize) -> String {
    let mut context = String::new();
    let mut used = 0;

    for result in results {
        let text = result.chunk.text.as_str();
        let separator = if context.is_empty() { 0 } else { CONTEXT_SEPARATOR.len() };
        let remaining = max_chars.saturating_sub(used + separator);
        if remaining == 0 {
            break;
        }

        if separator > 0 {
            context.push_str(CONTEXT_SEPARATOR);
        }

        let len = text.chars().count();
        if len <= remaining {
            context.push_str(text);
            used += separator + len;
        } else {
            context.extend(text.chars().take(remaining));
            break;
        }
    }

    context
}

/// Render the full instruction prompt for `question` grounded in `context`.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        r#"CONTEXT:
{context}

RULES:
- Answer only based on the CONTEXT.
- If the information is not explicitly in the CONTEXT, answer:
  "{REFUSAL}"
- NEVER invent or use outside knowledge.
- NEVER produce opinions or interpretations beyond what is written.

EXAMPLES OF QUESTIONS OUTSIDE THE CONTEXT:
Question: "What is the capital of France?"
Answer: "{REFUSAL}"

Question: "How many customers do we have in 2024?"
Answer: "{REFUSAL}"

Question: "Do you think this is good or bad?"
Answer: "{REFUSAL}"

USER QUESTION:
{question}

ANSWER THE "USER QUESTION"
"#
    )
}
