//! Error types for the embedding system

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Error type covering embedding model configuration, initialization, and
/// inference failures.
///
/// [`EmbedError::ModelUnavailable`] is the startup-fatal condition: the
/// underlying model could not be loaded or initialized. Callers building a
/// retrieval index treat it as "refuse to serve", not as something to retry
/// per request.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The embedding model could not be loaded or initialized
    #[error("Embedding model unavailable: {source}")]
    ModelUnavailable { source: anyhow::Error },

    /// Error during embedding generation
    #[error("Embedding generation failed: {source}")]
    EmbeddingGeneration { source: anyhow::Error },

    /// Error when the provider configuration is invalid
    #[error("Invalid embedding configuration: {message}")]
    InvalidConfig { message: String },

    /// Async task join errors
    #[error("Async task failed: {source}")]
    AsyncTask {
        #[from]
        source: tokio::task::JoinError,
    },

    /// Generic errors from other libraries
    #[error("External error: {source}")]
    External {
        #[from]
        source: anyhow::Error,
    },
}

impl EmbedError {
    /// Wrap a model load/initialization failure.
    pub fn model_unavailable<E: Into<anyhow::Error>>(source: E) -> Self {
        Self::ModelUnavailable {
            source: source.into(),
        }
    }

    /// Wrap an inference failure.
    pub fn embedding_gen<E: Into<anyhow::Error>>(source: E) -> Self {
        Self::EmbeddingGeneration {
            source: source.into(),
        }
    }

    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
