//! The retriever engine: one initialize at startup, many concurrent reads.
//!
//! `RetrieverEngine` owns the whole pipeline from corpus file to searchable
//! index. `initialize` runs once at process start (or again on explicit
//! reload, replacing the index wholesale); `retrieve` serves any number of
//! concurrent callers afterwards. The index lives behind a
//! `RwLock<Option<Arc<ChunkIndex>>>` — reads clone the `Arc` out and search
//! against an immutable value, so the steady-state path takes no lock during
//! the actual vector math.

use crate::error::{Result, RetrievalError};
use crate::retrieval::chunk_index::{ChunkIndex, DEFAULT_K, ScoredChunk};
use crate::retrieval::corpus::load_corpus;
use lex_ai_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Configuration for the retriever engine
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Path to the plain-text corpus file (chunks separated by blank lines)
    pub corpus_path: PathBuf,
    /// Embedding model configuration
    pub embed_config: EmbedConfig,
    /// Neighbor count used when the caller does not pass one
    pub default_k: usize,
}

impl RetrieverConfig {
    /// Create a configuration for the given corpus file with default
    /// embedding settings.
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            embed_config: EmbedConfig::default(),
            default_k: DEFAULT_K,
        }
    }

    /// Set the embedding configuration (builder style)
    pub fn with_embed_config(mut self, embed_config: EmbedConfig) -> Self {
        self.embed_config = embed_config;
        self
    }

    /// Set the default neighbor count (builder style)
    pub fn with_default_k(mut self, default_k: usize) -> Self {
        self.default_k = default_k;
        self
    }
}

/// Summary of a built index, for health reporting.
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub chunk_count: usize,
    pub dimension: usize,
    pub provider: String,
}

/// Orchestrates corpus loading, embedding, index building, and retrieval.
pub struct RetrieverEngine {
    config: RetrieverConfig,
    provider_override: Option<Arc<dyn EmbeddingProvider>>,
    index: RwLock<Option<Arc<ChunkIndex>>>,
}

impl std::fmt::Debug for RetrieverEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieverEngine")
            .field("config", &self.config)
            .field("provider_override", &self.provider_override.is_some())
            .finish()
    }
}

impl RetrieverEngine {
    /// Create an engine that will build a [`FastEmbedProvider`] from the
    /// configured [`EmbedConfig`] during [`initialize`](Self::initialize).
    /// The engine starts not-ready; no I/O happens here.
    pub fn new(config: RetrieverConfig) -> Self {
        Self {
            config,
            provider_override: None,
            index: RwLock::new(None),
        }
    }

    /// Create an engine bound to a caller-supplied embedding provider
    /// instead of the configured model. Used by tests and by callers that
    /// share one provider across several indices.
    pub fn with_provider(config: RetrieverConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            provider_override: Some(provider),
            index: RwLock::new(None),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Load the corpus, embed every chunk, and build the index.
    ///
    /// Runs once at startup; calling it again reloads the corpus and
    /// replaces the previous index wholesale. On failure any previous index
    /// is left untouched and the error is surfaced typed:
    /// [`RetrievalError::CorpusNotFound`], [`RetrievalError::EmptyCorpus`],
    /// [`RetrievalError::ModelUnavailable`], or
    /// [`RetrievalError::IndexBuildFailed`].
    pub async fn initialize(&self) -> Result<()> {
        let chunks = load_corpus(&self.config.corpus_path).await?;

        let provider: Arc<dyn EmbeddingProvider> = match &self.provider_override {
            Some(provider) => Arc::clone(provider),
            None => {
                let provider = FastEmbedProvider::create(self.config.embed_config.clone())
                    .await
                    .map_err(|source| {
                        error!("Embedding model failed to load: {source}");
                        RetrievalError::ModelUnavailable { source }
                    })?;
                Arc::new(provider)
            }
        };

        let index = ChunkIndex::build(chunks, provider).await?;
        info!(
            "Retriever ready: {} chunks from {}",
            index.len(),
            self.config.corpus_path.display()
        );

        *self.index.write().await = Some(Arc::new(index));
        Ok(())
    }

    async fn current_index(&self) -> Result<Arc<ChunkIndex>> {
        self.index
            .read()
            .await
            .as_ref()
            .cloned()
            .ok_or(RetrievalError::IndexNotReady)
    }

    /// Whether a successful [`initialize`](Self::initialize) has completed.
    pub async fn is_ready(&self) -> bool {
        self.index.read().await.is_some()
    }

    /// Stats of the current index, if one is built.
    pub async fn stats(&self) -> Option<IndexStats> {
        self.index.read().await.as_ref().map(|index| IndexStats {
            chunk_count: index.len(),
            dimension: index.dimension(),
            provider: index.provider_name().to_string(),
        })
    }

    /// Return the `k` chunk texts most relevant to `question`, ranked most
    /// similar first. Fails with [`RetrievalError::IndexNotReady`] until
    /// [`initialize`](Self::initialize) has succeeded.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<String>> {
        self.current_index().await?.search(question, k).await
    }

    /// Like [`retrieve`](Self::retrieve), with distances attached.
    pub async fn retrieve_scored(&self, question: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.current_index().await?.search_scored(question, k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::testing::StaticProvider;
    use std::path::Path;

    fn test_provider() -> Arc<StaticProvider> {
        Arc::new(StaticProvider::new(&[
            ("alpha", &[1.0, 0.0]),
            ("beta", &[0.0, 1.0]),
            ("query", &[0.9, 0.1]),
        ]))
    }

    #[tokio::test]
    async fn test_retrieve_before_initialize_is_not_ready() {
        let engine = RetrieverEngine::with_provider(
            RetrieverConfig::new("/nonexistent/corpus.txt"),
            test_provider(),
        );

        assert!(!engine.is_ready().await);
        let err = engine.retrieve("query", 1).await.unwrap_err();
        assert!(matches!(err, RetrievalError::IndexNotReady));
    }

    #[tokio::test]
    async fn test_initialize_missing_corpus() {
        let engine = RetrieverEngine::with_provider(
            RetrieverConfig::new("/nonexistent/corpus.txt"),
            test_provider(),
        );

        let err = engine.initialize().await.unwrap_err();
        assert!(matches!(err, RetrievalError::CorpusNotFound { .. }));
        // A failed build leaves the engine not-ready
        assert!(!engine.is_ready().await);
    }

    async fn write_corpus(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("corpus.txt");
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_initialize_then_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(dir.path(), "alpha\n\nbeta\n").await;

        let engine =
            RetrieverEngine::with_provider(RetrieverConfig::new(&path), test_provider());
        engine.initialize().await.unwrap();

        assert!(engine.is_ready().await);
        let stats = engine.stats().await.unwrap();
        assert_eq!(stats.chunk_count, 2);
        assert_eq!(stats.dimension, 2);
        assert_eq!(stats.provider, "static-test");

        let passages = engine.retrieve("query", 1).await.unwrap();
        assert_eq!(passages, vec!["alpha"]);

        let scored = engine.retrieve_scored("query", 2).await.unwrap();
        assert_eq!(scored.len(), 2);
        assert!(scored[0].distance <= scored[1].distance);
    }

    #[tokio::test]
    async fn test_reload_replaces_index_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(dir.path(), "alpha\n\nbeta\n").await;

        let engine =
            RetrieverEngine::with_provider(RetrieverConfig::new(&path), test_provider());
        engine.initialize().await.unwrap();
        assert_eq!(engine.stats().await.unwrap().chunk_count, 2);

        tokio::fs::write(&path, "alpha\n").await.unwrap();
        engine.initialize().await.unwrap();
        assert_eq!(engine.stats().await.unwrap().chunk_count, 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(dir.path(), "alpha\n\nbeta\n").await;

        let engine =
            RetrieverEngine::with_provider(RetrieverConfig::new(&path), test_provider());
        engine.initialize().await.unwrap();

        tokio::fs::write(&path, "\n\n").await.unwrap();
        let err = engine.initialize().await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmptyCorpus { .. }));

        // The old index still serves
        assert!(engine.is_ready().await);
        assert_eq!(engine.retrieve("query", 1).await.unwrap(), vec!["alpha"]);
    }

    #[test]
    fn test_config_builders() {
        let config = RetrieverConfig::new("corpus.txt")
            .with_default_k(5)
            .with_embed_config(EmbedConfig::default().with_batch_size(8));

        assert_eq!(config.default_k, 5);
        assert_eq!(config.embed_config.batch_size, 8);
        assert_eq!(config.corpus_path, PathBuf::from("corpus.txt"));
    }
}
