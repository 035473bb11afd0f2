//! lex-ai-retriever: semantic retrieval over a statute corpus
//!
//! This crate owns the retrieval half of the lex-ai stack: it loads a
//! plain-text corpus, splits it into paragraph chunks, embeds every chunk,
//! and answers ranked nearest-neighbor queries under cosine distance.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: corpus loading/chunking, the chunk index, and the
//!   retriever engine
//! - **[`error`]**: the typed failure taxonomy callers match on
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lex_ai_retriever::retrieval::engine::{RetrieverConfig, RetrieverEngine};
//!
//! # async fn example() -> Result<(), lex_ai_retriever::error::RetrievalError> {
//! let engine = RetrieverEngine::new(RetrieverConfig::new("legal_data/bareacts.txt"));
//! engine.initialize().await?;
//!
//! let passages = engine.retrieve("What is the punishment for theft?", 3).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! corpus file → split_chunks → embed_texts → ChunkIndex
//!                                               ↓
//!                       question → embed_text → cosine ranking → passages
//! ```
//!
//! The index is built once at startup (or wholesale on explicit reload) and
//! is immutable afterwards, so any number of concurrent retrieves can run
//! against it without locking.

pub mod error;
pub mod retrieval;
