//! # lex-ai-mcp
//!
//! A Model Context Protocol (MCP) server that answers legal questions over a
//! statute corpus. On startup it builds an in-memory semantic index over the
//! corpus (via [`lex-ai-retriever`]); per question it retrieves the most
//! relevant passages and, when a completion service is configured, passes
//! them as context to a chat model for a synthesized answer.
//!
//! ## MCP Tools
//!
//! - **`status`** — index health, corpus/model details, completion-service
//!   configuration state
//! - **`retrieve`** — ranked statute passages for a question, with
//!   similarity scores
//! - **`ask`** — retrieve passages, then ask the completion service for an
//!   answer grounded in them
//!
//! ## Configuration
//!
//! The corpus file and default passage count come from the CLI
//! (`--corpus`, `--top-k`). The completion service is configured through
//! environment variables (all four required for `ask` to be available):
//! `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`, `AZURE_DEPLOYMENT_NAME`,
//! `AZURE_OPENAI_API_VERSION`.
//!
//! ## Degraded mode
//!
//! If the index cannot be built at startup (corpus missing or empty, model
//! unavailable), the server still starts: `status` reports the failure and
//! the retrieval-dependent tools answer with an unavailability message
//! instead of crashing the process.

pub mod completion;
mod server;
pub mod tools;

use server::LexMcpServer;

use anyhow::Result;
use lex_ai_retriever::retrieval::DEFAULT_K;
use std::path::PathBuf;
use tracing::info;

/// Configuration for the lex-ai MCP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Plain-text statute corpus, chunks separated by blank lines
    pub corpus_path: PathBuf,
    /// Number of passages to retrieve when a tool call does not specify one
    pub default_k: usize,
}

impl ServerConfig {
    /// Create a server configuration for the given corpus file.
    pub fn new(corpus_path: PathBuf) -> Self {
        Self {
            corpus_path,
            default_k: DEFAULT_K,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("legal_data").join("bareacts.txt"))
    }
}

/// Run the lex-ai MCP server over stdio with the given configuration.
///
/// Builds the retrieval index once at startup, then serves until the client
/// disconnects. Index build failures are reported through the `status` tool
/// rather than aborting the server.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting lex-ai MCP server");

    let server = LexMcpServer::new(config).await;
    server.serve_stdio().await?;
    Ok(())
}
