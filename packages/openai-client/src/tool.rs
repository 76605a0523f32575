//! Tool-calling traits for OpenAI function calling.
//!
//! A [`Tool`] has typed arguments (deriving `Deserialize + JsonSchema`) and
//! a serializable output; its wire-format definition is generated from the
//! argument type. [`ErasedTool`] lets heterogeneous tools live together in
//! one registry, taking and returning raw JSON strings.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schema::parameters_schema;
use crate::types::ToolCallRequest;

/// A tool the model may call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;

    /// Argument type; its JSON schema is advertised to the model.
    type Args: DeserializeOwned + JsonSchema + Send;

    /// Output type, serialized back to the model as the tool result.
    type Output: Serialize + Send;

    /// Error type for failed executions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// What this tool does, phrased for the model.
    fn description(&self) -> &str;

    /// Execute the tool.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    /// Generate the tool definition advertised to the model.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.description().to_string(),
            parameters: parameters_schema::<Self::Args>(),
        }
    }
}

/// A tool definition: name, description, and parameter schema.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Convert to the OpenAI function-calling wire format.
    pub fn to_wire_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// Errors from executing a type-erased tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The model produced arguments that do not match the schema.
    #[error("failed to parse arguments: {0}")]
    ArgumentParse(String),

    /// The tool itself failed.
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// The tool output could not be serialized.
    #[error("failed to serialize output: {0}")]
    OutputSerialize(String),
}

/// Type-erased tool, for storing different tool types in one registry.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    /// The tool's name.
    fn name(&self) -> &str;

    /// The tool's wire-format definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute with JSON-string arguments, returning JSON-string output.
    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError>;
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError> {
        let args: T::Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::ArgumentParse(e.to_string()))?;

        let output = self
            .call(args)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        serde_json::to_string(&output).map_err(|e| ToolError::OutputSerialize(e.to_string()))
    }
}

/// A set of tools, looked up by name when the model requests a call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn ErasedTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool.
    pub fn register<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Wire-format definitions for every registered tool.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|t| t.definition().to_wire_format())
            .collect()
    }

    /// Execute a tool call requested by the model.
    ///
    /// Failures come back as `Err` strings so the caller can decide how to
    /// report them to the model; an unknown tool name is such a failure.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == call.function.name)
            .ok_or_else(|| {
                ToolError::Execution(format!("unknown tool '{}'", call.function.name))
            })?;

        tool.call_erased(&call.function.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionCall;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        message: String,
    }

    #[derive(Serialize)]
    struct EchoOutput {
        echoed: String,
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        const NAME: &'static str = "echo";
        type Args = EchoArgs;
        type Output = EchoOutput;
        type Error = std::convert::Infallible;

        fn description(&self) -> &str {
            "Echo back the input message"
        }

        async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
            Ok(EchoOutput {
                echoed: args.message,
            })
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: "call_1".to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn definition_uses_wire_format() {
        let def = Tool::definition(&EchoTool);
        let wire = def.to_wire_format();
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "echo");
        assert!(wire["function"]["parameters"].is_object());
    }

    #[tokio::test]
    async fn registry_dispatches_by_name() {
        let registry = ToolRegistry::new().register(EchoTool);
        assert_eq!(registry.len(), 1);

        let result = registry
            .dispatch(&call("echo", r#"{"message":"hello"}"#))
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["echoed"], "hello");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_execution_error() {
        let registry = ToolRegistry::new().register(EchoTool);
        let err = registry.dispatch(&call("nope", "{}")).await.unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
    }

    #[tokio::test]
    async fn malformed_arguments_are_reported() {
        let registry = ToolRegistry::new().register(EchoTool);
        let err = registry
            .dispatch(&call("echo", "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ArgumentParse(_)));
    }
}
