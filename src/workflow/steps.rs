// The three workflow step functions
//
// Each step reads the current state and returns the delta it produced; the
// runner owns folding and sequencing. Steps call the provider clients and
// nothing else.

use futures::future;
use serde::Deserialize;

use crate::completion::{ChatMessage, CompletionClient, OutputSchema};
use crate::search::SearchClient;

use super::error::WorkflowError;
use super::extract::{extract_code_block, CODE_FENCE_LANGUAGE};
use super::prompts;
use super::state::{StepUpdate, WorkflowState};

/// Queries requested from the research prompt.
pub const RESEARCH_QUERY_COUNT: usize = 3;

/// Search results requested per query.
pub const RESEARCH_RESULTS_PER_QUERY: u32 = 2;

/// Structured-output shape for the research step.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Queries {
    pub queries: Vec<String>,
}

/// JSON schema the completion provider decodes research output against.
pub fn queries_schema() -> OutputSchema {
    OutputSchema {
        name: "queries".to_string(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "queries": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["queries"],
            "additionalProperties": false
        }),
    }
}

/// Research: decode three search queries from the task, run them, and
/// collect the snippet texts in query order then result order.
///
/// A schema violation from structured decoding is fatal to the run. The
/// per-query searches are independent and run concurrently; the fold order
/// stays deterministic.
pub async fn research(
    completion: &dyn CompletionClient,
    search: &dyn SearchClient,
    state: &WorkflowState,
) -> Result<StepUpdate, WorkflowError> {
    let messages = vec![
        ChatMessage::system(prompts::research_prompt(&state.task)),
        ChatMessage::user(prompts::RESEARCH_USER_MESSAGE),
    ];

    let value = completion
        .complete_structured(&messages, &queries_schema())
        .await?;
    let decoded: Queries =
        serde_json::from_value(value).map_err(|e| WorkflowError::Decoding(e.to_string()))?;

    let queries: Vec<String> = decoded
        .queries
        .into_iter()
        .take(RESEARCH_QUERY_COUNT)
        .collect();

    tracing::debug!(count = queries.len(), "research queries decoded");

    let searches = queries
        .iter()
        .map(|query| search.search(query, RESEARCH_RESULTS_PER_QUERY));
    let results = future::try_join_all(searches).await?;

    let content: Vec<String> = results
        .into_iter()
        .flatten()
        .map(|result| result.content)
        .collect();

    tracing::debug!(snippets = content.len(), "research content gathered");

    Ok(StepUpdate::Research { content })
}

/// Generate: build the generation prompt (with the previous critique quoted
/// on revision passes), run one free-text completion, and extract the code.
pub async fn generate(
    completion: &dyn CompletionClient,
    state: &WorkflowState,
) -> Result<StepUpdate, WorkflowError> {
    let prompt = prompts::generate_prompt(&state.task, &state.joined_content(), &state.critique);
    let messages = vec![
        ChatMessage::system(prompt),
        ChatMessage::user(prompts::GENERATE_USER_MESSAGE),
    ];

    let response = completion.complete(&messages).await?;

    let extracted = extract_code_block(&response, CODE_FENCE_LANGUAGE);
    let fenced = extracted.is_fenced();
    if !fenced {
        tracing::debug!("no tagged fence in generation response; using full text");
    }

    Ok(StepUpdate::Generate {
        code: extracted.into_code(),
        revision_number: state.revision_number + 1,
        fenced,
    })
}

/// Review: one free-text completion over the task and current code; the
/// trimmed response becomes the critique as-is.
pub async fn review(
    completion: &dyn CompletionClient,
    state: &WorkflowState,
) -> Result<StepUpdate, WorkflowError> {
    let prompt = prompts::review_prompt(&state.task, &state.code);
    let messages = vec![
        ChatMessage::system(prompt),
        ChatMessage::user(prompts::REVIEW_USER_MESSAGE),
    ];

    let response = completion.complete(&messages).await?;

    Ok(StepUpdate::Review {
        critique: response.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_schema_shape() {
        let schema = queries_schema();
        assert_eq!(schema.name, "queries");
        assert_eq!(schema.schema["type"], "object");
        assert_eq!(
            schema.schema["properties"]["queries"]["items"]["type"],
            "string"
        );
        assert_eq!(schema.schema["additionalProperties"], false);
    }

    #[test]
    fn test_queries_deserialization() {
        let value = serde_json::json!({"queries": ["a", "b", "c"]});
        let decoded: Queries = serde_json::from_value(value).unwrap();
        assert_eq!(
            decoded,
            Queries {
                queries: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_queries_missing_field_fails() {
        let value = serde_json::json!({"searches": ["a"]});
        assert!(serde_json::from_value::<Queries>(value).is_err());
    }
}
