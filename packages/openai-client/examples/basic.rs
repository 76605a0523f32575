//! Basic chat completion with a tool definition.

use openai_client::{ChatMessage, ChatRequest, OpenAIClient, Tool, ToolRegistry};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, JsonSchema)]
struct TimeArgs {
    /// IANA timezone name, e.g. "Asia/Tokyo".
    timezone: String,
}

#[derive(Serialize)]
struct TimeOutput {
    timezone: String,
    note: String,
}

struct CurrentTime;

#[async_trait]
impl Tool for CurrentTime {
    const NAME: &'static str = "current_time";
    type Args = TimeArgs;
    type Output = TimeOutput;
    type Error = std::convert::Infallible;

    fn description(&self) -> &str {
        "Get the current time in a timezone"
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        Ok(TimeOutput {
            timezone: args.timezone,
            note: "example implementation".into(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;
    let tools = ToolRegistry::new().register(CurrentTime);

    let message = client
        .chat_completion(
            ChatRequest::new(
                "gpt-4.1",
                vec![
                    ChatMessage::system("You are a helpful assistant."),
                    ChatMessage::user("What time is it in Tokyo?"),
                ],
            )
            .with_tools(tools.definitions()),
        )
        .await?;

    if message.has_tool_calls() {
        for call in message.tool_calls.unwrap_or_default() {
            println!("model requested: {}({})", call.function.name, call.function.arguments);
        }
    } else {
        println!("{}", message.content.unwrap_or_default());
    }

    Ok(())
}
