use crate::ServerConfig;
use crate::completion::{CompletionClient, CompletionConfig};
use crate::tools::{self, ask::AskRequest, retrieve::RetrieveRequest};
use anyhow::Result;
use lex_ai_retriever::retrieval::engine::{RetrieverConfig, RetrieverEngine};
use rmcp::{ServerHandler, ServiceExt, model::ServerInfo, tool};
use std::sync::Arc;
use tokio::io::{stdin, stdout};
use tracing::{error, info};

/// MCP server answering legal questions over the statute corpus
#[derive(Clone)]
pub struct LexMcpServer {
    config: ServerConfig,
    engine: Arc<RetrieverEngine>,
    completion: Option<Arc<CompletionClient>>,
    /// Failure message from startup initialization, if the index is degraded
    init_error: Option<String>,
}

impl LexMcpServer {
    /// Create the server and build the retrieval index.
    ///
    /// An index build failure does not abort the server: the engine stays
    /// not-ready, `status` reports the failure, and retrieval tools answer
    /// with an unavailability message.
    pub async fn new(config: ServerConfig) -> Self {
        info!(
            "Initializing lex-ai MCP server with corpus: {:?}",
            config.corpus_path
        );

        let retriever_config =
            RetrieverConfig::new(&config.corpus_path).with_default_k(config.default_k);
        let engine = Arc::new(RetrieverEngine::new(retriever_config));

        let init_error = match engine.initialize().await {
            Ok(()) => None,
            Err(e) => {
                error!("Index initialization failed, serving degraded: {e}");
                Some(e.to_string())
            }
        };

        let completion = CompletionConfig::from_env()
            .map(|completion_config| Arc::new(CompletionClient::new(completion_config)));
        if completion.is_none() {
            info!("No completion service configured; ask tool will be unavailable");
        }

        Self {
            config,
            engine,
            completion,
            init_error,
        }
    }

    /// Status tool - index health and configuration
    #[tool(
        description = "Show retrieval index health, corpus and model details, and completion service configuration"
    )]
    async fn status(&self) -> String {
        info!("Processing status request");

        let mut status = format!(
            "lex-ai MCP Server Status\n\
            ========================\n\
            Server Version: {}\n\
            Corpus: {:?}\n\n",
            env!("CARGO_PKG_VERSION"),
            self.config.corpus_path
        );

        status.push_str("Retrieval Index\n---------------\n");
        match self.engine.stats().await {
            Some(stats) => {
                status.push_str(&format!(
                    "State: ✓ Ready\n\
                    Indexed Chunks: {}\n\
                    Embedding Dimension: {}\n\
                    Embedding Provider: {}\n\
                    Default Passages (k): {}\n\n",
                    stats.chunk_count,
                    stats.dimension,
                    stats.provider,
                    self.engine.config().default_k
                ));
            }
            None => {
                status.push_str("State: ✗ Not ready (degraded mode)\n");
                if let Some(reason) = &self.init_error {
                    status.push_str(&format!("Startup Failure: {reason}\n"));
                }
                status.push_str(
                    "\nRetrieval-dependent tools are unavailable until the corpus \
                    and embedding model load successfully.\n\n",
                );
            }
        }

        status.push_str("Completion Service\n------------------\n");
        if self.completion.is_some() {
            status.push_str("State: ✓ Configured (ask tool available)\n\n");
        } else {
            status.push_str(
                "State: ⚠ Not configured (retrieval only)\n\
                Set AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_API_KEY, AZURE_DEPLOYMENT_NAME, \
                and AZURE_OPENAI_API_VERSION to enable the ask tool.\n\n",
            );
        }

        status.push_str(
            "Troubleshooting\n\
            ---------------\n\
            • Corpus not found: check the --corpus path; chunks are separated by blank lines\n\
            • Empty corpus: the file must contain at least one non-blank paragraph\n\
            • Model unavailable: first run downloads the embedding model; check network access\n",
        );

        status
    }

    /// Retrieve tool - ranked statute passages
    #[tool(
        description = "Retrieve the statute passages most relevant to a legal question, ranked by semantic similarity"
    )]
    async fn retrieve(&self, request: RetrieveRequest) -> Result<String, String> {
        tools::retrieve::retrieve(&self.engine, self.engine.config().default_k, request).await
    }

    /// Ask tool - retrieval-augmented answer
    #[tool(
        description = "Answer a legal question using retrieved statute passages as context for the completion service"
    )]
    async fn ask(&self, request: AskRequest) -> Result<String, String> {
        tools::ask::ask(
            &self.engine,
            self.completion.as_deref(),
            self.engine.config().default_k,
            request,
        )
        .await
    }

    /// Serve the MCP server using stdio transport
    pub async fn serve_stdio(&self) -> Result<()> {
        info!("Starting MCP server with stdio transport");

        let transport = (stdin(), stdout());
        let server = self.clone().serve(transport).await?;

        let quit_reason = server.waiting().await?;
        info!("MCP server quit: {:?}", quit_reason);
        Ok(())
    }
}

impl ServerHandler for LexMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "lex-ai MCP server - retrieves relevant statute passages for legal questions \
                 and synthesizes grounded answers through a completion service"
                    .into(),
            ),
            ..Default::default()
        }
    }
}
