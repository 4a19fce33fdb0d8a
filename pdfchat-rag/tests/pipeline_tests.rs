//! End-to-end ingest and answer scenarios over the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pdfchat_rag::{
    Answer, AnswerEngine, Document, EmbeddingProvider, InMemoryVectorStore, LanguageModel,
    REFUSAL, RagConfig, RagError, RagPipeline, SourceMetadata,
};

const DIM: usize = 64;

/// Bag-of-words hashing embedder: texts sharing words point the same way.
struct HashEmbedder;

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        let mut v = vec![0.0f32; DIM];
        for token in tokens(text) {
            let hash = token.bytes().fold(0xcbf29ce484222325u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x100000001b3)
            });
            v[(hash % DIM as u64) as usize] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "test".into(), message: "rate limited".into() })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Drops the last vector of every batch.
struct ShortEmbedder;

#[async_trait]
impl EmbeddingProvider for ShortEmbedder {
    async fn embed(&self, text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        HashEmbedder.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> pdfchat_rag::Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::new();
        for text in texts.iter().skip(1) {
            vectors.push(HashEmbedder.embed(text).await?);
        }
        Ok(vectors)
    }

    fn name(&self) -> &str {
        "short"
    }
}

/// Answers with the first context line sharing a long word with the
/// question, or the refusal. Records every prompt it receives.
#[derive(Default)]
struct ExtractiveModel {
    prompts: Mutex<Vec<String>>,
}

impl ExtractiveModel {
    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

fn section<'a>(prompt: &'a str, start: &str, end: &str) -> &'a str {
    let from = prompt.find(start).map(|i| i + start.len()).unwrap_or(0);
    let to = prompt[from..].find(end).map(|i| from + i).unwrap_or(prompt.len());
    &prompt[from..to]
}

#[async_trait]
impl LanguageModel for ExtractiveModel {
    async fn generate(&self, prompt: &str) -> pdfchat_rag::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let context = section(prompt, "CONTEXT:\n", "\n\nRULES:");
        let question = section(prompt, "USER QUESTION:\n", "\n");
        let keywords: Vec<String> = tokens(question).filter(|t| t.len() >= 5).collect();

        let hit = context.lines().find(|line| {
            let words: Vec<String> = tokens(line).collect();
            keywords.iter().any(|k| words.contains(k))
        });

        Ok(hit.map(str::to_string).unwrap_or_else(|| REFUSAL.to_string()))
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> pdfchat_rag::Result<String> {
        Err(RagError::ModelError { provider: "test".into(), message: "401 unauthorized".into() })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Counts calls so tests can assert the store was not touched.
struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> pdfchat_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn pages(texts: &[&str]) -> Vec<Document> {
    texts
        .iter()
        .enumerate()
        .map(|(page, text)| {
            Document::new(
                *text,
                SourceMetadata { source: "document.pdf".into(), page, total_pages: texts.len() },
            )
        })
        .collect()
}

fn pipeline_with(embedder: Arc<dyn EmbeddingProvider>) -> Arc<RagPipeline> {
    Arc::new(
        RagPipeline::builder()
            .config(RagConfig::default())
            .embedding_provider(embedder)
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build()
            .unwrap(),
    )
}

fn report_pages() -> Vec<Document> {
    pages(&[
        "Annual report of Example Corp.\nTotal revenue in 2023 was $5 million.",
        "The company employs 40 people across two offices.",
        "Operating costs were reduced by automating the invoice process.",
    ])
}

#[tokio::test]
async fn revenue_question_is_answered_from_context() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();
    pipeline.ingest(&report_pages()).await.unwrap();

    let model = Arc::new(ExtractiveModel::default());
    let engine = AnswerEngine::new(pipeline, model.clone());

    let answer = engine.answer("What was the revenue in 2023?").await.unwrap();
    assert!(answer.text().contains("$5 million"), "got: {answer}");
    assert_eq!(model.calls(), 1);

    // Few-shot examples are instructions, never part of the answer.
    assert!(!answer.text().contains("capital of France"));
    assert!(model.last_prompt().contains("What was the revenue in 2023?"));
}

#[tokio::test]
async fn out_of_context_question_gets_the_refusal() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();
    pipeline.ingest(&report_pages()).await.unwrap();

    let model = Arc::new(ExtractiveModel::default());
    let engine = AnswerEngine::new(pipeline, model.clone());

    let answer = engine.answer("What is the capital of France?").await.unwrap();
    assert_eq!(answer.text(), REFUSAL);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn empty_collection_refuses_without_calling_the_model() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();

    let model = Arc::new(ExtractiveModel::default());
    let engine = AnswerEngine::new(pipeline, model.clone());

    let answer = engine.answer("What was the revenue in 2023?").await.unwrap();
    assert_eq!(answer, Answer::NoContext);
    assert_eq!(answer.to_string(), REFUSAL);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn prompt_context_follows_rank_order() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();
    pipeline.ingest(&report_pages()).await.unwrap();

    let results = pipeline.search("total revenue 2023", 10).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].chunk.text.contains("$5 million"));
    assert_eq!(results[0].chunk.metadata.page, 0);

    let model = Arc::new(ExtractiveModel::default());
    let engine = AnswerEngine::new(pipeline, model.clone());
    engine.answer("total revenue 2023").await.unwrap();

    let prompt = model.last_prompt();
    let expected: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
    assert!(prompt.contains(&expected.join("\n\n")));
}

#[tokio::test]
async fn reingesting_appends_duplicates() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();

    let first = pipeline.ingest(&report_pages()).await.unwrap();
    assert_eq!(first.page_count, 3);
    assert_eq!(first.chunk_count, 3);
    assert_eq!(pipeline.count().await.unwrap(), 3);

    pipeline.ingest(&report_pages()).await.unwrap();
    assert_eq!(pipeline.count().await.unwrap(), 6);
}

#[tokio::test]
async fn search_is_bounded_by_k() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();
    let many: Vec<String> = (0..15).map(|i| format!("Fact number {i} about revenue.")).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    pipeline.ingest(&pages(&refs)).await.unwrap();

    let results = pipeline.search("revenue", 10).await.unwrap();
    assert_eq!(results.len(), 10);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn blank_pages_store_nothing_and_skip_embedding() {
    let embedder = Arc::new(CountingEmbedder { inner: HashEmbedder, calls: AtomicUsize::new(0) });
    let pipeline = pipeline_with(embedder.clone());
    pipeline.ensure_collection().await.unwrap();

    let report = pipeline.ingest(&pages(&["", "   "])).await.unwrap();
    assert_eq!(report.chunk_count, 0);
    assert!(report.ids.is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedding_failure_keeps_its_variant() {
    let pipeline = pipeline_with(Arc::new(FailingEmbedder));
    pipeline.ensure_collection().await.unwrap();

    let err = pipeline.ingest(&report_pages()).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }), "got: {err:?}");
    assert!(err.to_string().contains("rate limited"));

    let err = pipeline.search("q", 10).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }), "got: {err:?}");

    let engine = AnswerEngine::new(pipeline, Arc::new(ExtractiveModel::default()));
    let err = engine.answer("anything").await.unwrap_err();
    assert!(matches!(
        err,
        RagError::EmbeddingError { ref message, .. } if message == "rate limited"
    ));
}

#[tokio::test]
async fn vector_count_mismatch_is_a_pipeline_error() {
    let pipeline = pipeline_with(Arc::new(ShortEmbedder));
    pipeline.ensure_collection().await.unwrap();

    let err = pipeline.ingest(&report_pages()).await.unwrap_err();
    assert!(matches!(err, RagError::PipelineError(_)), "got: {err:?}");
    assert_eq!(pipeline.count().await.unwrap(), 0);
}

#[tokio::test]
async fn search_on_unknown_collection_is_empty() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));

    assert!(pipeline.search("revenue", 10).await.unwrap().is_empty());
    assert_eq!(pipeline.count().await.unwrap(), 0);
}

#[tokio::test]
async fn model_failure_propagates_unchanged() {
    let pipeline = pipeline_with(Arc::new(HashEmbedder));
    pipeline.ensure_collection().await.unwrap();
    pipeline.ingest(&report_pages()).await.unwrap();

    let engine = AnswerEngine::new(pipeline, Arc::new(FailingModel));
    let err = engine.answer("What was the revenue in 2023?").await.unwrap_err();
    assert!(matches!(err, RagError::ModelError { .. }));
}

#[tokio::test]
async fn builder_requires_embedder_and_store() {
    let err = RagPipeline::builder().build().err().unwrap();
    assert!(matches!(err, RagError::ConfigError(_)));

    let err = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbedder))
        .build()
        .err()
        .unwrap();
    assert!(err.to_string().contains("vector_store"));
}
