//! Blocking client for an Ollama-compatible text generation endpoint.
//!
//! The model is asked for JSON output and the reply text is decoded into a
//! [`serde_json::Value`]; interpreting that value is left to the adapters
//! built on top of this client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from the text generation client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// The endpoint could not be reached.
    #[error("model endpoint is not available at {url}: {message}")]
    Unavailable {
        /// Endpoint URL.
        url: String,
        /// Transport failure description.
        message: String,
    },

    /// The endpoint answered with an error status.
    #[error("model request failed: {message}")]
    RequestFailed {
        /// Failure description.
        message: String,
    },

    /// The reply could not be decoded.
    #[error("failed to parse model response: {message}")]
    ParseError {
        /// Decoding failure description.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("model request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

/// Configuration for the Ollama client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_owned(),
            model: "llama3.2".to_owned(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the Ollama `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    agent: ureq::Agent,
}

impl OllamaClient {
    /// Creates a client with the given configuration.
    #[must_use]
    pub fn new(config: OllamaConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Sends `prompt` in JSON mode and decodes the generated text.
    ///
    /// This call blocks; async callers should run it on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the endpoint is unreachable, answers with an
    /// error status, times out, or produces text that is not JSON.
    pub fn generate_json(&self, prompt: &str) -> Result<Value, LlmError> {
        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            format: "json",
        };

        let response = self
            .agent
            .post(&url)
            .send_json(&request)
            .map_err(|err| self.map_transport_error(&url, err))?;
        let body: GenerateResponse = response.into_json().map_err(|err| LlmError::ParseError {
            message: err.to_string(),
        })?;

        serde_json::from_str(&body.response).map_err(|err| LlmError::ParseError {
            message: format!("model output is not JSON: {err}"),
        })
    }

    fn map_transport_error(&self, url: &str, err: ureq::Error) -> LlmError {
        match err {
            ureq::Error::Status(code, response) => LlmError::RequestFailed {
                message: format!("HTTP {code}: {}", response.status_text()),
            },
            ureq::Error::Transport(transport) => {
                let message = transport.to_string();
                if message.contains("timed out") {
                    LlmError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    LlmError::Unavailable {
                        url: url.to_owned(),
                        message,
                    }
                }
            }
        }
    }
}
