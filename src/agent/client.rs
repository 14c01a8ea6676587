use log::debug;
use thiserror::Error;

use crate::models::{AssistantMessage, ChatRequest, ChatResponse};

/// Provider failures. Never fatal to a session; the turn driver falls back
/// to a deterministic move instead.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned no choices")]
    EmptyResponse,
}

/// A chat-completions backend the agent can talk to.
pub trait ChatProvider {
    fn complete(&self, request: &ChatRequest) -> Result<AssistantMessage, AgentError>;
}

/// An OpenAI-compatible chat-completions endpoint over HTTP.
pub struct HttpChatProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl HttpChatProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        HttpChatProvider {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl ChatProvider for HttpChatProvider {
    fn complete(&self, request: &ChatRequest) -> Result<AssistantMessage, AgentError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("POST {} model={}", url, request.model);

        let response: ChatResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(AgentError::EmptyResponse)
    }
}
