use anyhow::Result;
use clap::{Arg, Command};
use lex_ai_mcp::{ServerConfig, run_server};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse command line arguments
    let matches = Command::new("lex-ai-mcp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("lex-ai legal retrieval MCP server")
        .arg(
            Arg::new("corpus")
                .short('c')
                .long("corpus")
                .value_name("FILE")
                .help("Plain-text statute corpus, chunks separated by blank lines")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("top-k")
                .short('k')
                .long("top-k")
                .value_name("N")
                .help("Default number of passages to retrieve per question")
                .value_parser(clap::value_parser!(usize)),
        )
        .get_matches();

    // Build configuration from CLI arguments
    let mut config = ServerConfig::default();

    if let Some(corpus_path) = matches.get_one::<PathBuf>("corpus") {
        config.corpus_path = corpus_path.clone();
    }
    if let Some(top_k) = matches.get_one::<usize>("top-k") {
        config.default_k = *top_k;
    }

    // Run the server
    run_server(config).await
}
