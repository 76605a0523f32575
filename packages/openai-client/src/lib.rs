//! Minimal OpenAI chat-completions client with function calling.
//!
//! Typed messages, typed tool definitions, no domain logic. The
//! tool-calling loop itself lives with the caller; this crate only sends
//! one completion request at a time.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatMessage, ChatRequest, OpenAIClient};
//!
//! let client = OpenAIClient::from_env()?;
//! let message = client
//!     .chat_completion(ChatRequest::new(
//!         "gpt-4.1",
//!         vec![ChatMessage::user("Hello!")],
//!     ))
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod tool;
pub mod types;

pub use error::{OpenAIError, Result};
pub use tool::{ErasedTool, Tool, ToolDefinition, ToolError, ToolRegistry};
pub use types::{
    ChatChoice, ChatCompletion, ChatMessage, ChatRequest, FunctionCall, ToolCallRequest, Usage,
};

use reqwest::Client;
use tracing::{debug, warn};

/// Base URL for GitHub Models, which serves OpenAI-compatible completions.
pub const GITHUB_MODELS_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the environment.
    ///
    /// Prefers `OPENAI_API_KEY`; falls back to `GITHUB_TOKEN` pointed at
    /// GitHub Models, which exposes the same API surface for free.
    pub fn from_env() -> Result<Self> {
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            return Ok(Self::new(api_key));
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            return Ok(Self::new(token).with_base_url(GITHUB_MODELS_BASE_URL));
        }
        Err(OpenAIError::Config(
            "neither OPENAI_API_KEY nor GITHUB_TOKEN is set".into(),
        ))
    }

    /// Set a custom base URL (Azure, GitHub Models, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat completion request and return the first choice's
    /// message, tool calls included.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatMessage> {
        let start = std::time::Instant::now();

        debug!(
            model = %request.model,
            message_count = request.messages.len(),
            tool_count = request.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network { source: e }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "OpenAI API error");
            return Err(OpenAIError::Api { status, body });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion received"
        );

        completion
            .into_message()
            .ok_or(OpenAIError::EmptyCompletion)
    }
}
