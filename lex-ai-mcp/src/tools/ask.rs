//! Ask tool: retrieve context passages, then synthesize an answer through
//! the chat-completion service.

use crate::completion::CompletionClient;
use crate::tools::retrieve::describe_error;
use lex_ai_retriever::retrieval::RetrieverEngine;
use rmcp::schemars;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AskRequest {
    #[schemars(description = "The legal question to answer")]
    pub question: String,
    #[schemars(description = "Number of context passages to retrieve (default 3)")]
    pub k: Option<u32>,
}

const SYSTEM_PROMPT: &str = "You are a legal expert for Indian citizens.";

/// Build the grounded user prompt from retrieved passages.
///
/// The model is instructed to answer only from the provided context and to
/// recommend consulting a qualified legal professional when the context does
/// not cover the question.
fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful legal assistant for Indian citizens. Use the following context \
         to answer the user's question.\n\
         If the context does not contain enough information to answer the question, state \
         that you cannot answer based on the provided context, and suggest consulting a \
         qualified legal professional or visiting a legal aid center.\n\
         Provide clear, simple explanations suitable for common people.\n\n\
         Context:\n{context}\n\n\
         Question: {question}"
    )
}

pub async fn ask(
    engine: &RetrieverEngine,
    completion: Option<&CompletionClient>,
    default_k: usize,
    request: AskRequest,
) -> Result<String, String> {
    let Some(client) = completion else {
        return Err(
            "No completion service is configured. Set AZURE_OPENAI_ENDPOINT, \
             AZURE_OPENAI_API_KEY, AZURE_DEPLOYMENT_NAME, and AZURE_OPENAI_API_VERSION, \
             or use the retrieve tool for raw passages."
                .to_string(),
        );
    };

    let k = request.k.map(|k| k as usize).unwrap_or(default_k);
    info!("Processing ask: question='{}', k={}", request.question, k);

    let passages = engine
        .retrieve(&request.question, k)
        .await
        .map_err(|e| describe_error(&e))?;

    let context = passages.join("\n\n");
    let prompt = build_prompt(&context, &request.question);

    let answer = client
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| format!("Completion service call failed: {e:#}"))?;

    let mut output = format!("{answer}\n\n---\nSources ({} passages):\n\n", passages.len());
    for (rank, passage) in passages.iter().enumerate() {
        output.push_str(&format!("{}. {}\n\n", rank + 1, passage));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = build_prompt("Section 378. Theft.", "What is theft?");

        assert!(prompt.contains("Context:\nSection 378. Theft."));
        assert!(prompt.contains("Question: What is theft?"));
        assert!(prompt.contains("qualified legal professional"));
    }
}
