use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ModelConfig;
use crate::error::AppError;

/// Fixed system instruction sent ahead of every conversation.
const SYSTEM_PROMPT: &str = "You are a meal-planning assistant. Help the user plan \
affordable weekly meals. When the user asks for a full plan, respond with a short \
introduction followed by a JSON object containing a `recipes` array, where each \
recipe has `day_of_week`, `meal_slot`, `title`, `instructions`, `estimated_cost` \
and an `ingredients` array of objects with `name`, `quantity`, `unit`, `category` \
and `estimated_price`. Otherwise answer conversationally.";

/// One turn of conversation as forwarded upstream.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }

    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("model API key is not configured")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model response contained no choices")]
    Empty,
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::MissingApiKey => AppError::GatewayUnavailable,
            GatewayError::Http(err) => AppError::Upstream {
                status: err.status().map_or(502, |s| s.as_u16()),
                body: err.to_string(),
            },
            GatewayError::Api { status, body } => AppError::Upstream { status, body },
            GatewayError::Empty => AppError::Upstream {
                status: 502,
                body: "empty model response".into(),
            },
        }
    }
}

/// Boundary to the external language model. Swapped for a scripted fake in tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GatewayError>;
}

// OpenAI-compatible chat-completions wire format.

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

pub struct HttpModelClient {
    http: Client,
    config: ModelConfig,
}

impl HttpModelClient {
    pub fn new(config: ModelConfig) -> anyhow::Result<Self> {
        // Single request deadline; a timed-out call surfaces as an upstream error.
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey)?;

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatTurn::system(SYSTEM_PROMPT));
        messages.extend(turns.iter().cloned());

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %self.config.model, turns = turns.len(), "calling model API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "model API returned an error");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GatewayError::Empty)
    }
}
