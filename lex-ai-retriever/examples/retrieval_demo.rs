//! End-to-end retrieval demo: write a small statute corpus, build the index
//! with the real embedding model, and run a few queries against it.

use lex_ai_retriever::retrieval::engine::{RetrieverConfig, RetrieverEngine};

const SAMPLE_CORPUS: &str = "\
Section 378. Theft. Whoever, intending to take dishonestly any movable \
property out of the possession of any person without that person's consent, \
moves that property, is said to commit theft.

Section 390. Robbery. In all robbery there is either theft or extortion. \
Theft is robbery if the offender voluntarily causes or attempts to cause \
death, hurt, or wrongful restraint.

Section 13. Divorce. Any marriage solemnized may, on a petition presented \
by either the husband or the wife, be dissolved by a decree of divorce.

Section 10. Contract. All agreements are contracts if they are made by the \
free consent of parties competent to contract, for a lawful consideration.
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let dir = tempfile::tempdir()?;
    let corpus_path = dir.path().join("bareacts.txt");
    tokio::fs::write(&corpus_path, SAMPLE_CORPUS).await?;

    let engine = RetrieverEngine::new(RetrieverConfig::new(&corpus_path));
    println!("Building index (first run downloads the embedding model)...");
    engine.initialize().await?;

    let stats = engine.stats().await.expect("engine just initialized");
    println!(
        "Index ready: {} chunks, dimension {}\n",
        stats.chunk_count, stats.dimension
    );

    for question in [
        "What is the punishment for stealing?",
        "How can a marriage be ended?",
        "When is an agreement enforceable?",
    ] {
        println!("Q: {question}");
        for hit in engine.retrieve_scored(question, 2).await? {
            let first_line = hit.text.lines().next().unwrap_or("");
            println!("   {:.3}  {}", hit.similarity(), first_line);
        }
        println!();
    }

    Ok(())
}
