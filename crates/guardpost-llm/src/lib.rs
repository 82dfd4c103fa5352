//! OpenAI-compatible chat client with tool calling.
//!
//! Works with the OpenAI API and any compatible endpoint. The conversation
//! driver talks to the model through the [`ChatBackend`] trait so it can be
//! exercised with a scripted backend in tests.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs,
        FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use guardpost_core::{AgentError, ToolCall, ToolSchema};
use tracing::info;

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Response from a model call: either final text or tool invocations.
///
/// Tool-call responses may also carry assistant text; the driver keeps it as
/// the best-available answer if the iteration budget runs out.
#[derive(Debug, Clone)]
pub enum ChatResponse {
    Content { text: String, metrics: LlmMetrics },
    ToolCalls { calls: Vec<ToolCall>, text: Option<String>, metrics: LlmMetrics },
}

/// The black-box capability the conversation driver loops against: given a
/// conversation and a tool catalog, produce text or a batch of tool calls.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError>;
}

/// Converts any error into an AgentError::LlmError.
fn llm_err(e: impl ToString) -> AgentError {
    AgentError::LlmError(e.to_string())
}

/// Builds a user message.
pub fn user_message(content: &str) -> Result<ChatCompletionRequestMessage, AgentError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(llm_err)?,
    ))
}

/// Builds an assistant message with plain text content.
pub fn assistant_message(content: &str) -> Result<ChatCompletionRequestMessage, AgentError> {
    Ok(ChatCompletionRequestMessage::Assistant(
        ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map_err(llm_err)?,
    ))
}

/// Builds the assistant turn that requested a batch of tool calls. Required
/// before the matching tool-result messages are appended.
pub fn assistant_tool_calls_message(
    calls: &[ToolCall],
) -> Result<ChatCompletionRequestMessage, AgentError> {
    let tool_calls: Vec<ChatCompletionMessageToolCall> = calls
        .iter()
        .map(|c| ChatCompletionMessageToolCall {
            id: c.id.clone(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: c.name.clone(),
                arguments: c.arguments.to_string(),
            },
        })
        .collect();

    Ok(ChatCompletionRequestMessage::Assistant(
        ChatCompletionRequestAssistantMessageArgs::default()
            .tool_calls(tool_calls)
            .build()
            .map_err(llm_err)?,
    ))
}

/// Builds a tool result message for one completed call.
pub fn tool_result_message(
    tool_call_id: &str,
    content: &str,
) -> Result<ChatCompletionRequestMessage, AgentError> {
    Ok(ChatCompletionRequestMessage::Tool(
        ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(tool_call_id)
            .content(content)
            .build()
            .map_err(llm_err)?,
    ))
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    default_model: String,
}

impl LlmClient {
    /// Creates a new client for the given model and optional API base URL.
    pub fn new(model: &str, api_base: Option<&str>) -> Self {
        let config = match api_base {
            Some(base) => OpenAIConfig::new().with_api_base(base).with_api_key("local"),
            None => OpenAIConfig::default(),
        };

        Self {
            client: Client::with_config(config),
            default_model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[ChatCompletionRequestMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError> {
        let start = Instant::now();

        let openai_tools: Vec<ChatCompletionTool> = tools
            .iter()
            .map(|t| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: t.name.clone(),
                    description: Some(t.description.clone()),
                    parameters: Some(t.parameters.clone()),
                    strict: None,
                },
            })
            .collect();

        let mut all_messages = vec![ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(llm_err)?,
        )];
        all_messages.extend(messages.iter().cloned());

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(&self.default_model).messages(all_messages);

        if !openai_tools.is_empty() {
            request_builder.tools(openai_tools);
        }

        let request = request_builder.build().map_err(llm_err)?;
        let response = self.client.chat().create(request).await.map_err(llm_err)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (input_tokens, output_tokens) = response
            .usage
            .as_ref()
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        let metrics = LlmMetrics { input_tokens, output_tokens, elapsed_ms };

        info!(
            "LLM: {}ms, tokens: {}/{} (in/out)",
            elapsed_ms, input_tokens, output_tokens
        );

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmError("No response choices".into()))?;

        if let Some(tool_calls) = choice.message.tool_calls {
            if !tool_calls.is_empty() {
                let calls = tool_calls
                    .into_iter()
                    .map(|tc| {
                        let args: serde_json::Value = serde_json::from_str(&tc.function.arguments)
                            .unwrap_or(serde_json::Value::Null);
                        ToolCall {
                            id: tc.id,
                            name: tc.function.name,
                            arguments: args,
                        }
                    })
                    .collect();
                return Ok(ChatResponse::ToolCalls {
                    calls,
                    text: choice.message.content,
                    metrics,
                });
            }
        }

        let text = choice
            .message
            .content
            .ok_or_else(|| AgentError::LlmError("No response content".into()))?;

        Ok(ChatResponse::Content { text, metrics })
    }
}
