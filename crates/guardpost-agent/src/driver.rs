//! The conversation driver: the model/tool round-trip loop behind one chat
//! turn.

use std::sync::Arc;

use async_openai::types::ChatCompletionRequestMessage;
use futures::future::join_all;
use guardpost_core::{AgentError, Message, MessageRole, ToolSchema};
use guardpost_llm::{
    assistant_message, assistant_tool_calls_message, tool_result_message, user_message,
    ChatBackend, ChatResponse,
};
use guardpost_tools::ToolDispatcher;
use tracing::{debug, info, warn};

/// Returned when the iteration budget runs out without any usable text.
pub const FALLBACK_RESPONSE: &str = "I couldn't generate a response. Please try again.";

/// Drives one conversation turn: calls the model, executes any requested
/// tool batch concurrently, feeds results back, and repeats until the model
/// produces text or the iteration ceiling is hit.
pub struct ConversationDriver {
    backend: Arc<dyn ChatBackend>,
    dispatcher: ToolDispatcher,
    catalog: Vec<ToolSchema>,
    system_prompt: &'static str,
    max_iterations: usize,
}

impl ConversationDriver {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        dispatcher: ToolDispatcher,
        catalog: Vec<ToolSchema>,
        system_prompt: &'static str,
        max_iterations: usize,
    ) -> Self {
        Self { backend, dispatcher, catalog, system_prompt, max_iterations }
    }

    /// The catalog advertised to the model, for introspection endpoints.
    pub fn catalog(&self) -> &[ToolSchema] {
        &self.catalog
    }

    /// Runs one turn against stored history plus the new user message.
    /// Always returns a non-empty string on success.
    pub async fn run(&self, history: &[Message], user_input: &str) -> Result<String, AgentError> {
        let mut messages = self.replay_history(history)?;
        messages.push(user_message(user_input)?);

        let mut response = self
            .backend
            .chat_with_tools(self.system_prompt, &messages, &self.catalog)
            .await?;
        let mut iterations = 0;
        let mut last_text: Option<String> = None;

        loop {
            match response {
                ChatResponse::Content { text, metrics } => {
                    info!(
                        iterations,
                        output_tokens = metrics.output_tokens,
                        "conversation turn complete"
                    );
                    if text.trim().is_empty() {
                        return Ok(FALLBACK_RESPONSE.to_string());
                    }
                    return Ok(text);
                }
                ChatResponse::ToolCalls { calls, text, metrics: _ } => {
                    if let Some(t) = text.filter(|t| !t.trim().is_empty()) {
                        last_text = Some(t);
                    }
                    if iterations >= self.max_iterations {
                        warn!(
                            max = self.max_iterations,
                            "iteration ceiling reached, returning best available text"
                        );
                        break;
                    }

                    debug!(
                        batch = calls.len(),
                        tools = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                        "executing tool batch"
                    );
                    messages.push(assistant_tool_calls_message(&calls)?);

                    // Fan out the whole batch and rejoin in request order.
                    let results = join_all(
                        calls.iter().map(|c| self.dispatcher.dispatch(&c.name, &c.arguments)),
                    )
                    .await;
                    for (call, result) in calls.iter().zip(&results) {
                        messages.push(tool_result_message(&call.id, result)?);
                    }

                    response = self
                        .backend
                        .chat_with_tools(self.system_prompt, &messages, &self.catalog)
                        .await?;
                    iterations += 1;
                }
            }
        }

        Ok(last_text.unwrap_or_else(|| FALLBACK_RESPONSE.to_string()))
    }

    fn replay_history(
        &self,
        history: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        history
            .iter()
            .map(|m| match m.role {
                MessageRole::User => user_message(&m.content),
                MessageRole::Assistant => assistant_message(&m.content),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use guardpost_core::ToolCall;
    use guardpost_db::WorkforceStore;
    use guardpost_llm::LlmMetrics;
    use guardpost_tools::{fixed_catalog, LookbackDefaults};
    use serde_json::json;

    /// Backend that replays a scripted sequence of responses and records the
    /// conversations it was shown.
    struct ScriptedBackend {
        script: Mutex<Vec<ChatResponse>>,
        calls_seen: AtomicUsize,
        observed: Mutex<Vec<Vec<ChatCompletionRequestMessage>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<ChatResponse>) -> Self {
            Self {
                script: Mutex::new(script),
                calls_seen: AtomicUsize::new(0),
                observed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat_with_tools(
            &self,
            _system_prompt: &str,
            messages: &[ChatCompletionRequestMessage],
            _tools: &[ToolSchema],
        ) -> Result<ChatResponse, AgentError> {
            self.calls_seen.fetch_add(1, Ordering::SeqCst);
            self.observed.lock().unwrap().push(messages.to_vec());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(AgentError::LlmError("script exhausted".to_string()));
            }
            Ok(script.remove(0))
        }
    }

    fn metrics() -> LlmMetrics {
        LlmMetrics::default()
    }

    fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall { id: id.to_string(), name: name.to_string(), arguments }
    }

    fn driver_with(backend: Arc<ScriptedBackend>, max_iterations: usize) -> ConversationDriver {
        let store = WorkforceStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        let dispatcher =
            ToolDispatcher::new(Arc::new(store), LookbackDefaults::default(), false);
        ConversationDriver::new(
            backend,
            dispatcher,
            fixed_catalog(),
            crate::prompts::SYSTEM_PROMPT,
            max_iterations,
        )
    }

    #[tokio::test]
    async fn test_plain_answer_passes_through() {
        let backend = Arc::new(ScriptedBackend::new(vec![ChatResponse::Content {
            text: "All quiet.".to_string(),
            metrics: metrics(),
        }]));
        let driver = driver_with(backend.clone(), 10);

        let answer = driver.run(&[], "Any incidents?").await.unwrap();
        assert_eq!(answer, "All quiet.");
        assert_eq!(backend.calls_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tool_round_trip_preserves_batch_order() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            ChatResponse::ToolCalls {
                calls: vec![
                    tool_call("call_a", "get_dashboard_stats", json!({})),
                    tool_call("call_b", "get_all_clients", json!({})),
                    tool_call("call_c", "nonexistent_tool", json!({})),
                ],
                text: None,
                metrics: metrics(),
            },
            ChatResponse::Content { text: "Here you go.".to_string(), metrics: metrics() },
        ]));
        let driver = driver_with(backend.clone(), 10);

        let answer = driver.run(&[], "Give me an overview").await.unwrap();
        assert_eq!(answer, "Here you go.");

        // Second model call sees the assistant tool-call turn plus three
        // tool results, in request order.
        let observed = backend.observed.lock().unwrap();
        let second = &observed[1];
        assert_eq!(second.len(), 5);
        let tool_ids: Vec<&str> = second
            .iter()
            .filter_map(|m| match m {
                ChatCompletionRequestMessage::Tool(t) => Some(t.tool_call_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tool_ids, vec!["call_a", "call_b", "call_c"]);
    }

    #[tokio::test]
    async fn test_iteration_ceiling_stops_the_loop() {
        // 11 forced tool-call responses against a ceiling of 10: the driver
        // executes 10 batches, never makes an 11th round trip, and falls
        // back to the canned sentence.
        let script: Vec<ChatResponse> = (0..11)
            .map(|i| ChatResponse::ToolCalls {
                calls: vec![tool_call(&format!("call_{i}"), "get_dashboard_stats", json!({}))],
                text: None,
                metrics: metrics(),
            })
            .collect();
        let backend = Arc::new(ScriptedBackend::new(script));
        let driver = driver_with(backend.clone(), 10);

        let answer = driver.run(&[], "loop forever").await.unwrap();
        assert_eq!(answer, FALLBACK_RESPONSE);
        assert_eq!(backend.calls_seen.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_ceiling_returns_best_available_text() {
        let mut script: Vec<ChatResponse> = (0..11)
            .map(|i| ChatResponse::ToolCalls {
                calls: vec![tool_call(&format!("call_{i}"), "get_dashboard_stats", json!({}))],
                text: None,
                metrics: metrics(),
            })
            .collect();
        script[10] = ChatResponse::ToolCalls {
            calls: vec![tool_call("call_10", "get_dashboard_stats", json!({}))],
            text: Some("Partial summary so far.".to_string()),
            metrics: metrics(),
        };
        let backend = Arc::new(ScriptedBackend::new(script));
        let driver = driver_with(backend, 10);

        let answer = driver.run(&[], "loop forever").await.unwrap();
        assert_eq!(answer, "Partial summary so far.");
    }

    #[tokio::test]
    async fn test_history_is_replayed_before_user_message() {
        let backend = Arc::new(ScriptedBackend::new(vec![ChatResponse::Content {
            text: "Following up.".to_string(),
            metrics: metrics(),
        }]));
        let driver = driver_with(backend.clone(), 10);

        let history =
            vec![Message::user("Who is on duty?"), Message::assistant("Two guards are on duty.")];
        driver.run(&history, "At which sites?").await.unwrap();

        let observed = backend.observed.lock().unwrap();
        assert_eq!(observed[0].len(), 3);
        assert!(matches!(observed[0][0], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(observed[0][1], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(observed[0][2], ChatCompletionRequestMessage::User(_)));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let driver = driver_with(backend, 10);

        let err = driver.run(&[], "hello").await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(_)));
    }
}
