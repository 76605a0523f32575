//! OpenAI chat-completions request and response types.
//!
//! Messages are fully typed, including the assistant's tool-call requests
//! and the `tool` role used to return tool results. This keeps conversation
//! history serializable and replayable as plain data.

use serde::{Deserialize, Serialize};

/// A single chat message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role: "system", "user", "assistant", or "tool"
    pub role: String,

    /// Message text. Absent on assistant turns that only request tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,

    /// On "tool" messages, the id of the call this result answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a tool-result message answering the call with the given id.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Whether this message carries tool-call requests.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls
            .as_ref()
            .map(|calls| !calls.is_empty())
            .unwrap_or(false)
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Id of this call, echoed back in the tool-result message.
    pub id: String,

    /// Always "function".
    #[serde(rename = "type")]
    pub call_type: String,

    /// The function to invoke and its JSON-encoded arguments.
    pub function: FunctionCall,
}

/// The function half of a tool call: name plus raw JSON arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,

    /// Arguments as a JSON string, exactly as the model produced them.
    pub arguments: String,
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g. "gpt-4.1", "gpt-4o")
    pub model: String,

    /// Full conversation so far.
    pub messages: Vec<ChatMessage>,

    /// Tool definitions, already in OpenAI wire format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,

    /// Tool choice policy ("auto" when tools are present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a request with the given model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            tool_choice: None,
            temperature: None,
        }
    }

    /// Attach tool definitions; sets tool_choice to "auto".
    pub fn with_tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        if !tools.is_empty() {
            self.tools = Some(tools);
            self.tool_choice = Some("auto".to_string());
        }
        self
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Raw chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatChoice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Take the first choice's message, if any.
    pub fn into_message(self) -> Option<ChatMessage> {
        self.choices.into_iter().next().map(|c| c.message)
    }
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage for a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
