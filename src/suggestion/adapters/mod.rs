//! Adapter implementations for the suggester port.

mod ollama;

pub use ollama::{OllamaTaskDetailSuggester, parse_suggestion_reply};
