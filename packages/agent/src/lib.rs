//! Conversational Mercari shopping agent.
//!
//! Thin orchestration over the function-calling oracle: the model decides
//! which tools to call; this crate executes them against the listing
//! source and the scoring engine, feeds results back, and returns the
//! model's final natural-language answer together with the extended
//! conversation history.

pub mod conversation;
pub mod prompt;
pub mod report;
pub mod tools;

pub use conversation::Conversation;
pub use report::{ErrorReport, ToolReply};
pub use tools::{AnalyzeListings, GetListingDetails, SearchMercari};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use marketplace::{ListingSource, WeightTable};
use openai_client::{
    ChatMessage, ChatRequest, OpenAIClient, OpenAIError, ToolError, ToolRegistry,
};

/// Default cap on oracle round trips within one conversation turn.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Errors from running a conversation turn.
///
/// Tool failures never surface here; they go back to the model as
/// structured reports. Only oracle transport failures and a runaway
/// tool-calling loop end the turn.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The oracle could not be reached or rejected the request.
    #[error(transparent)]
    Oracle(#[from] OpenAIError),

    /// The model kept requesting tools past the iteration cap.
    #[error("conversation turn exceeded {limit} tool-calling iterations")]
    MaxIterations { limit: usize },
}

/// The chat-completion seam, so turns can run against a scripted oracle
/// in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatMessage, OpenAIError>;
}

#[async_trait]
impl ChatBackend for OpenAIClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatMessage, OpenAIError> {
        self.chat_completion(request).await
    }
}

/// Outcome of one conversation turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The model's final natural-language reply.
    pub reply: String,

    /// The input history extended with this turn's user and assistant
    /// messages.
    pub history: Conversation,

    /// Names of the tools executed during the turn, in call order.
    pub tools_called: Vec<String>,

    /// Oracle round trips taken.
    pub iterations: usize,
}

/// The shopping agent: model, tools, and the tool-calling loop.
pub struct ShoppingAgent<B: ChatBackend> {
    backend: B,
    model: String,
    tools: ToolRegistry,
    system_prompt: String,
    max_iterations: usize,
}

impl<B: ChatBackend> ShoppingAgent<B> {
    /// Build an agent with the standard three tools over the given source.
    pub fn new<S: ListingSource + 'static>(backend: B, model: impl Into<String>, source: Arc<S>) -> Self {
        let tools = ToolRegistry::new()
            .register(SearchMercari::new(source.clone()))
            .register(AnalyzeListings::new(WeightTable::default()))
            .register(GetListingDetails::new(source));

        Self {
            backend,
            model: model.into(),
            tools,
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Replace the scoring weight table (keeps the standard tools).
    pub fn with_weights<S: ListingSource + 'static>(
        backend: B,
        model: impl Into<String>,
        source: Arc<S>,
        weights: WeightTable,
    ) -> Self {
        let tools = ToolRegistry::new()
            .register(SearchMercari::new(source.clone()))
            .register(AnalyzeListings::new(weights))
            .register(GetListingDetails::new(source));

        Self {
            backend,
            model: model.into(),
            tools,
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run one conversation turn.
    ///
    /// The input history is not mutated; the outcome carries the extended
    /// history. Tool exchanges stay local to the turn.
    pub async fn run_turn(
        &self,
        user_text: impl Into<String>,
        history: &Conversation,
    ) -> Result<TurnOutcome, AgentError> {
        let user_message = ChatMessage::user(user_text);

        let mut messages: Vec<ChatMessage> =
            Vec::with_capacity(history.len() + 2 + self.max_iterations);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend_from_slice(history.messages());
        messages.push(user_message.clone());

        let mut tools_called = Vec::new();

        for iteration in 1..=self.max_iterations {
            debug!(
                iteration,
                model = %self.model,
                message_count = messages.len(),
                "Requesting completion"
            );

            let request = ChatRequest::new(self.model.clone(), messages.clone())
                .with_tools(self.tools.definitions());
            let message = self.backend.complete(request).await?;

            if !message.has_tool_calls() {
                let reply = message.content.clone().unwrap_or_default();
                info!(
                    iterations = iteration,
                    tools_called = tools_called.len(),
                    "Turn complete"
                );

                let history = history
                    .with_message(user_message)
                    .with_message(ChatMessage::assistant(reply.clone()));

                return Ok(TurnOutcome {
                    reply,
                    history,
                    tools_called,
                    iterations: iteration,
                });
            }

            let calls = message.tool_calls.clone().unwrap_or_default();
            messages.push(message);

            for call in &calls {
                info!(
                    tool = %call.function.name,
                    id = %call.id,
                    arguments = %call.function.arguments,
                    "Executing tool call"
                );
                tools_called.push(call.function.name.clone());

                let content = match self.tools.dispatch(call).await {
                    Ok(result) => result,
                    Err(e) => {
                        // Dispatch-level failures (unknown tool, malformed
                        // arguments) go back as reports too, so the model
                        // can self-correct.
                        warn!(tool = %call.function.name, error = %e, "Tool dispatch failed");
                        let kind = match &e {
                            ToolError::ArgumentParse(_) => "invalid_argument",
                            _ => "tool_error",
                        };
                        serde_json::to_string(&serde_json::json!({
                            "error": ErrorReport::new(kind, e.to_string())
                        }))
                        .unwrap_or_else(|_| format!("{{\"error\":\"{e}\"}}"))
                    }
                };

                messages.push(ChatMessage::tool_result(call.id.clone(), content));
            }
        }

        warn!(limit = self.max_iterations, "Turn exceeded iteration cap");
        Err(AgentError::MaxIterations {
            limit: self.max_iterations,
        })
    }
}
