//! Corpus loading, the chunk index, and the retriever engine.

pub mod chunk_index;
pub mod corpus;
pub mod engine;

pub use chunk_index::{ChunkIndex, DEFAULT_K, ScoredChunk};
pub use corpus::{load_corpus, split_chunks};
pub use engine::{IndexStats, RetrieverConfig, RetrieverEngine};
