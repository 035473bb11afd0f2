//! Error types for the retrieval system

use lex_ai_embed::EmbedError;
use std::path::PathBuf;

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Failure taxonomy for corpus loading, index building, and search.
///
/// Startup-fatal conditions ([`CorpusNotFound`](RetrievalError::CorpusNotFound),
/// [`EmptyCorpus`](RetrievalError::EmptyCorpus),
/// [`ModelUnavailable`](RetrievalError::ModelUnavailable),
/// [`IndexBuildFailed`](RetrievalError::IndexBuildFailed)) mean the serving
/// layer should report degraded health and refuse retrieval-dependent
/// requests. [`IndexNotReady`](RetrievalError::IndexNotReady) and
/// [`InvalidK`](RetrievalError::InvalidK) are per-request conditions the
/// caller translates into its own responses. Every variant is matchable
/// without inspecting message strings, and the core never retries or
/// swallows any of them.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The corpus file does not exist
    #[error("Corpus file not found: {path}")]
    CorpusNotFound { path: PathBuf },

    /// The corpus file produced zero non-empty chunks
    #[error("Corpus at {path} contains no non-empty chunks")]
    EmptyCorpus { path: PathBuf },

    /// The embedding model could not be loaded at startup
    #[error("Embedding model unavailable: {source}")]
    ModelUnavailable { source: EmbedError },

    /// Building the search structure failed
    #[error("Index build failed: {reason}")]
    IndexBuildFailed { reason: String },

    /// Retrieve was called before a successful initialize
    #[error("Retrieval index is not ready; initialize the engine first")]
    IndexNotReady,

    /// The requested neighbor count is unusable
    #[error("Invalid neighbor count k={k}; k must be at least 1")]
    InvalidK { k: usize },

    /// Embedding a query or chunk batch failed after startup
    #[error("Embedding failed: {source}")]
    Embedding { source: EmbedError },

    /// I/O failure reading the corpus, other than the file being absent
    #[error("I/O error reading corpus: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
