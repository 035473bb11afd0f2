//! Retrieve tool: ranked statute passages for a question.

use lex_ai_retriever::error::RetrievalError;
use lex_ai_retriever::retrieval::RetrieverEngine;
use rmcp::schemars;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RetrieveRequest {
    #[schemars(description = "The legal question to find relevant statute passages for")]
    pub question: String,
    #[schemars(description = "Number of passages to return (default 3)")]
    pub k: Option<u32>,
}

/// Translate a retrieval failure into a user-facing tool error.
///
/// `IndexNotReady` becomes a service-unavailable message and `InvalidK` a
/// precise rejection; everything else is reported verbatim.
pub(crate) fn describe_error(err: &RetrievalError) -> String {
    match err {
        RetrievalError::IndexNotReady => {
            "The retrieval index is not ready. The corpus failed to load at startup; \
             see the status tool for details."
                .to_string()
        }
        RetrievalError::InvalidK { k } => {
            format!("Invalid passage count k={k}: k must be at least 1.")
        }
        other => format!("Retrieval failed: {other}"),
    }
}

pub async fn retrieve(
    engine: &RetrieverEngine,
    default_k: usize,
    request: RetrieveRequest,
) -> Result<String, String> {
    let k = request.k.map(|k| k as usize).unwrap_or(default_k);
    info!("Processing retrieve: question='{}', k={}", request.question, k);

    let hits = engine
        .retrieve_scored(&request.question, k)
        .await
        .map_err(|e| describe_error(&e))?;

    let mut output = format!(
        "Top {} passages for: '{}'\n\n",
        hits.len(),
        request.question
    );
    for (rank, hit) in hits.iter().enumerate() {
        output.push_str(&format!(
            "{}. [chunk {}] similarity {:.3}\n{}\n\n",
            rank + 1,
            hit.index,
            hit.similarity(),
            hit.text
        ));
    }

    Ok(output)
}
