//! Ranking oracle backed by a language model served through Ollama.

use crate::llm::{LlmError, OllamaClient};
use crate::prioritization::{
    domain::RankingCandidate,
    ports::{RankingOracle, RankingOracleError, RankingOracleResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use minijinja::{Environment, context};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const RANKING_PROMPT: &str = "\
You are a task prioritization expert. Given the following list of tasks, \
prioritize them based on their due date and estimated completion time. \
Tasks with earlier due dates and longer estimated completion times should be \
prioritized higher.

Tasks:
{% for task in tasks -%}
- Id: {{ task.id }}, Title: {{ task.title }}, Due Date: {{ task.dueDate }}, \
Estimated Completion Time: {{ task.estimatedCompletionTime }} hours
{% endfor %}
Return every task in prioritized order as a JSON object of the form \
{\"tasks\": [{\"id\": \"<task id>\"}]}, most urgent first.";

/// Oracle that asks a language model to order the candidates.
#[derive(Debug, Clone)]
pub struct OllamaRankingOracle {
    client: Arc<OllamaClient>,
}

impl OllamaRankingOracle {
    /// Creates an oracle using `client`.
    #[must_use]
    pub const fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }
}

/// Renders the ranking prompt for `candidates`.
///
/// # Errors
///
/// Returns [`RankingOracleError::MalformedResponse`] if the template cannot
/// be rendered.
pub fn render_ranking_prompt(candidates: &[RankingCandidate]) -> RankingOracleResult<String> {
    Environment::new()
        .render_str(RANKING_PROMPT, context! { tasks => candidates })
        .map_err(|err| RankingOracleError::MalformedResponse(format!("prompt rendering: {err}")))
}

/// Extracts the ordered identifiers from a model reply.
///
/// Accepts a bare array or an object with a `tasks` array. Each entry must
/// be an object with a non-empty string `id`, or a bare identifier string.
///
/// # Errors
///
/// Returns [`RankingOracleError::MalformedResponse`] when the reply does not
/// have that shape.
pub fn parse_ranking_reply(reply: &Value) -> RankingOracleResult<Vec<TaskId>> {
    let entries = match reply {
        Value::Array(entries) => entries,
        Value::Object(fields) => fields
            .get("tasks")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("expected a `tasks` array"))?,
        _ => return Err(malformed("expected an array or an object")),
    };

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let raw = match entry {
                Value::String(id) => Some(id.as_str()),
                Value::Object(fields) => fields.get("id").and_then(Value::as_str),
                _ => None,
            }
            .ok_or_else(|| malformed(&format!("entry {position} has no string `id`")))?;
            TaskId::from_string(raw)
                .map_err(|err| malformed(&format!("entry {position}: {err}")))
        })
        .collect()
}

fn malformed(reason: &str) -> RankingOracleError {
    RankingOracleError::MalformedResponse(reason.to_owned())
}

fn map_llm_error(err: LlmError) -> RankingOracleError {
    match err {
        LlmError::Timeout { timeout_secs } => RankingOracleError::Timeout {
            after: Duration::from_secs(timeout_secs),
        },
        LlmError::ParseError { message } => RankingOracleError::MalformedResponse(message),
        other @ (LlmError::Unavailable { .. } | LlmError::RequestFailed { .. }) => {
            RankingOracleError::unavailable(other)
        }
    }
}

#[async_trait]
impl RankingOracle for OllamaRankingOracle {
    async fn rank(&self, candidates: &[RankingCandidate]) -> RankingOracleResult<Vec<TaskId>> {
        let prompt = render_ranking_prompt(candidates)?;
        let client = Arc::clone(&self.client);
        tracing::debug!(
            candidates = candidates.len(),
            model = %client.config().model,
            "requesting ranking from model"
        );
        let reply = tokio::task::spawn_blocking(move || client.generate_json(&prompt))
            .await
            .map_err(RankingOracleError::unavailable)?
            .map_err(map_llm_error)?;
        parse_ranking_reply(&reply)
    }
}
