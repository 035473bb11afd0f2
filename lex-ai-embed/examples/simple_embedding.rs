//! Simple example demonstrating real embedding generation with fastembed

use lex_ai_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = EmbedConfig::default().with_batch_size(2);

    println!("Creating FastEmbed provider:");
    println!("   Model: {}", config.model_name);
    println!("   Batch size: {}", config.batch_size);
    println!("   Normalize: {}", config.normalize);

    // First run downloads the model into fastembed's cache directory
    let provider = FastEmbedProvider::create(config).await?;

    println!("Provider initialized");
    println!("   Dimension: {}", provider.embedding_dimension());
    println!("   Provider: {}", provider.provider_name());

    let text = "Whoever commits theft shall be punished with imprisonment.";
    let embedding = provider.embed_text(text).await?;

    println!("\nText: \"{text}\"");
    println!("   Embedding dimension: {}", embedding.len());
    println!(
        "   First 5 values: {:?}",
        &embedding[..5.min(embedding.len())]
    );

    let texts = vec![
        "What is the punishment for stealing?".to_string(),
        "A marriage may be dissolved by a decree of divorce.".to_string(),
    ];
    let result = provider.embed_texts(&texts).await?;

    println!("\nGenerated {} embeddings", result.len());
    for (text, embedding) in texts.iter().zip(result.embeddings.iter()) {
        let dot: f32 = embedding
            .iter()
            .zip(provider.embed_text("theft").await?.iter())
            .map(|(a, b)| a.to_f32() * b.to_f32())
            .sum();
        println!("   \"{text}\" · \"theft\" = {dot:.3}");
    }

    Ok(())
}
