//! # lex-ai-embed
//!
//! Text embedding for the lex-ai retrieval stack, built on local ONNX models
//! via FastEmbed. Converts statute passages and user questions into
//! fixed-length dense vectors in one shared semantic space.
//!
//! ## Features
//!
//! - **Local ONNX Models**: embeddings are computed in-process, no external
//!   API calls
//! - **Async-First Design**: inference runs on blocking worker threads so the
//!   async request path is never stalled
//! - **Model Caching**: a loaded model is reused across providers with the
//!   same configuration
//! - **Half-Precision**: vectors are stored as f16 to halve memory use
//!
//! ## Quick Start
//!
//! ```no_run
//! use lex_ai_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = FastEmbedProvider::create(EmbedConfig::default()).await?;
//!
//! let texts = vec![
//!     "Section 498A: cruelty by husband or relatives".to_string(),
//!     "What protects women from domestic cruelty?".to_string(),
//! ];
//! let result = provider.embed_texts(&texts).await?;
//!
//! println!("{} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! ## Contract
//!
//! [`EmbeddingProvider::embed_texts`] preserves input order positionally:
//! `result[i]` is the embedding of `texts[i]`. Batching is purely a
//! performance concern and never changes individual outputs. A model that
//! cannot be loaded surfaces as [`EmbedError::ModelUnavailable`], which
//! callers treat as fatal at startup rather than per-call recoverable.

pub mod config;
pub mod error;
pub mod provider;

pub use config::EmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, FastEmbedProvider};
