//! End-to-end retrieval flow: corpus file → initialize → ranked retrieve.

use async_trait::async_trait;
use half::f16;
use lex_ai_embed::{EmbeddingProvider, EmbeddingResult};
use lex_ai_retriever::error::RetrievalError;
use lex_ai_retriever::retrieval::engine::{RetrieverConfig, RetrieverEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Deterministic embedding over a fixed word vocabulary: each dimension
/// counts occurrences of one vocabulary word. Identical texts get identical
/// vectors, and texts sharing more words land closer under cosine distance.
struct WordCountProvider {
    vocabulary: Vec<&'static str>,
}

impl WordCountProvider {
    fn new() -> Self {
        Self {
            vocabulary: vec![
                "theft", "robbery", "punishment", "property", "marriage", "divorce", "contract",
            ],
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f16> {
        let lower = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|word| {
                let count = lower.split_whitespace().filter(|w| {
                    w.trim_matches(|c: char| !c.is_alphanumeric()) == *word
                }).count();
                f16::from_f32(count as f32)
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for WordCountProvider {
    async fn embed_text(&self, text: &str) -> lex_ai_embed::Result<Vec<f16>> {
        Ok(self.vectorize(text))
    }

    async fn embed_texts(&self, texts: &[String]) -> lex_ai_embed::Result<EmbeddingResult> {
        Ok(EmbeddingResult::new(
            texts.iter().map(|t| self.vectorize(t)).collect(),
        ))
    }

    fn embedding_dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn provider_name(&self) -> &str {
        "word-count-test"
    }
}

const CORPUS: &str = "\
Section 378. Theft. Whoever intends to take dishonestly any movable property commits theft.

Section 390. Robbery. In all robbery there is either theft or extortion.

Section 13. Divorce. A marriage may be dissolved by a decree of divorce.

Section 10. Contract. All agreements are contracts made by free consent.
";

async fn ready_engine() -> (tempfile::TempDir, RetrieverEngine) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bareacts.txt");
    tokio::fs::write(&path, CORPUS).await.unwrap();

    let engine = RetrieverEngine::with_provider(
        RetrieverConfig::new(&path),
        Arc::new(WordCountProvider::new()),
    );
    engine.initialize().await.unwrap();
    (dir, engine)
}

#[tokio::test]
async fn retrieve_returns_min_k_verbatim_chunks() {
    let (_dir, engine) = ready_engine().await;
    let originals: Vec<&str> = CORPUS.split("\n\n").map(str::trim).collect();

    for k in 1..=6 {
        let passages = engine.retrieve("What is the punishment for theft?", k).await.unwrap();
        assert_eq!(passages.len(), k.min(4));
        for passage in &passages {
            assert!(
                originals.contains(&passage.as_str()),
                "retrieved text must be an original chunk, verbatim: {passage:?}"
            );
        }
    }
}

#[tokio::test]
async fn retrieval_is_ranked_and_deterministic() {
    let (_dir, engine) = ready_engine().await;

    let scored = engine
        .retrieve_scored("theft and robbery of property", 4)
        .await
        .unwrap();
    for pair in scored.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
    // The theft section shares the most vocabulary with the query
    assert!(scored[0].text.contains("Theft"));

    let again = engine
        .retrieve("theft and robbery of property", 4)
        .await
        .unwrap();
    let first: Vec<String> = scored.into_iter().map(|hit| hit.text).collect();
    assert_eq!(first, again);
}

#[tokio::test]
async fn each_chunk_is_its_own_nearest_neighbor() {
    let (_dir, engine) = ready_engine().await;
    let originals: Vec<&str> = CORPUS.split("\n\n").map(str::trim).collect();

    for original in originals {
        let top = engine.retrieve(original, 1).await.unwrap();
        assert_eq!(top, vec![original.to_string()]);
    }
}

#[tokio::test]
async fn invalid_k_is_rejected() {
    let (_dir, engine) = ready_engine().await;

    let err = engine.retrieve("theft", 0).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidK { k: 0 }));
}

#[tokio::test]
async fn engine_reports_not_ready_before_initialize() {
    let engine = RetrieverEngine::with_provider(
        RetrieverConfig::new(PathBuf::from("/missing/bareacts.txt")),
        Arc::new(WordCountProvider::new()),
    );

    let err = engine.retrieve("theft", 3).await.unwrap_err();
    assert!(matches!(err, RetrievalError::IndexNotReady));
}

#[tokio::test]
async fn empty_corpus_is_distinguished_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("absent.txt");
    let engine = RetrieverEngine::with_provider(
        RetrieverConfig::new(&missing),
        Arc::new(WordCountProvider::new()),
    );
    assert!(matches!(
        engine.initialize().await.unwrap_err(),
        RetrievalError::CorpusNotFound { .. }
    ));

    let blank = dir.path().join("blank.txt");
    tokio::fs::write(&blank, "\n\n\n").await.unwrap();
    let engine = RetrieverEngine::with_provider(
        RetrieverConfig::new(&blank),
        Arc::new(WordCountProvider::new()),
    );
    assert!(matches!(
        engine.initialize().await.unwrap_err(),
        RetrievalError::EmptyCorpus { .. }
    ));
}

#[tokio::test]
async fn concurrent_retrieves_share_one_index() {
    let (_dir, engine) = ready_engine().await;
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.retrieve("theft of property", 2).await.unwrap()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}
