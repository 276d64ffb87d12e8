//! Suggester backed by a language model served through Ollama.

use crate::llm::{LlmError, OllamaClient};
use crate::suggestion::{
    domain::TaskDetailSuggestion,
    ports::{TaskDetailSuggester, TaskDetailSuggesterError, TaskDetailSuggesterResult},
};
use async_trait::async_trait;
use minijinja::{Environment, context};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const SUGGESTION_PROMPT: &str = "\
You are a task management assistant that suggests labels and subtasks for a \
given task description.

Based on the task description, provide a list of suggested labels and a list \
of suggested subtasks to help the user organize and break down the task. \
Answer with a JSON object of the form \
{\"suggestedLabels\": [\"...\"], \"suggestedSubtasks\": [\"...\"]}.

Task Description: {{ description }}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionReply {
    suggested_labels: Vec<String>,
    suggested_subtasks: Vec<String>,
}

/// Suggester that asks a language model for labels and subtasks.
#[derive(Debug, Clone)]
pub struct OllamaTaskDetailSuggester {
    client: Arc<OllamaClient>,
}

impl OllamaTaskDetailSuggester {
    /// Creates a suggester using `client`.
    #[must_use]
    pub const fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

/// Decodes a model reply into a suggestion.
///
/// # Errors
///
/// Returns [`TaskDetailSuggesterError::MalformedResponse`] when either list
/// is missing or holds non-string entries.
pub fn parse_suggestion_reply(reply: Value) -> TaskDetailSuggesterResult<TaskDetailSuggestion> {
    let decoded: SuggestionReply = serde_json::from_value(reply)
        .map_err(|err| TaskDetailSuggesterError::MalformedResponse(err.to_string()))?;
    Ok(TaskDetailSuggestion::new(
        decoded.suggested_labels,
        decoded.suggested_subtasks,
    ))
}

fn map_llm_error(err: LlmError) -> TaskDetailSuggesterError {
    match err {
        LlmError::Timeout { timeout_secs } => TaskDetailSuggesterError::Timeout(timeout_secs),
        LlmError::ParseError { message } => TaskDetailSuggesterError::MalformedResponse(message),
        other @ (LlmError::Unavailable { .. } | LlmError::RequestFailed { .. }) => {
            TaskDetailSuggesterError::unavailable(other)
        }
    }
}

#[async_trait]
impl TaskDetailSuggester for OllamaTaskDetailSuggester {
    async fn suggest(&self, description: &str) -> TaskDetailSuggesterResult<TaskDetailSuggestion> {
        let prompt = Environment::new()
            .render_str(SUGGESTION_PROMPT, context! { description => description })
            .map_err(|err| TaskDetailSuggesterError::MalformedResponse(err.to_string()))?;
        let client = Arc::clone(&self.client);
        let reply = tokio::task::spawn_blocking(move || client.generate_json(&prompt))
            .await
            .map_err(TaskDetailSuggesterError::unavailable)?
            .map_err(map_llm_error)?;
        parse_suggestion_reply(reply)
    }
}
