//! The chat endpoint: one conversation turn per request.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Validates the request, replays session history through the conversation
/// driver, and records the completed turn.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = match req.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => return Err(AppError::BadRequest("Message is required".to_string())),
    };
    if !state.api_key_configured {
        return Err(AppError::Internal("OpenAI API key not configured".to_string()));
    }

    let session_id = req.session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let history = state.sessions.history(&session_id);
    info!(session = %session_id, history_turns = history.len(), "chat turn started");

    let response = state
        .driver
        .run(&history, message)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to process chat message: {e}")))?;

    state.sessions.append_turn(&session_id, message, &response);

    Ok(Json(ChatResponse { response, session_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_openai::types::ChatCompletionRequestMessage;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use guardpost_agent::{ConversationDriver, SessionStore, SYSTEM_PROMPT};
    use guardpost_core::{AgentError, ToolCall, ToolSchema};
    use guardpost_db::WorkforceStore;
    use guardpost_llm::{ChatBackend, ChatResponse as BackendResponse, LlmMetrics};
    use guardpost_tools::{fixed_catalog, LookbackDefaults, ToolDispatcher};
    use serde_json::{json, Value};

    struct ScriptedBackend {
        script: Mutex<Vec<BackendResponse>>,
        calls_seen: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(script: Vec<BackendResponse>) -> Self {
            Self { script: Mutex::new(script), calls_seen: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat_with_tools(
            &self,
            _system_prompt: &str,
            _messages: &[ChatCompletionRequestMessage],
            _tools: &[ToolSchema],
        ) -> Result<BackendResponse, AgentError> {
            self.calls_seen.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(AgentError::LlmError("script exhausted".to_string()));
            }
            Ok(script.remove(0))
        }
    }

    fn test_state(backend: Arc<ScriptedBackend>, api_key_configured: bool) -> Arc<AppState> {
        let store = WorkforceStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        let dispatcher =
            ToolDispatcher::new(Arc::new(store), LookbackDefaults::default(), false);
        let driver =
            ConversationDriver::new(backend, dispatcher, fixed_catalog(), SYSTEM_PROMPT, 10);
        Arc::new(AppState {
            driver,
            sessions: SessionStore::new(Duration::from_secs(60)),
            api_key_configured,
        })
    }

    async fn error_envelope(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_message_is_400_without_backend_call() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let state = test_state(backend.clone(), true);

        let result = chat(
            State(state),
            Json(ChatRequest { message: None, session_id: None }),
        )
        .await;

        let (status, body) = error_envelope(result.err().unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message is required"}));
        assert_eq!(backend.calls_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_500_without_backend_call() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let state = test_state(backend.clone(), false);

        let result = chat(
            State(state),
            Json(ChatRequest { message: Some("Who is on duty?".to_string()), session_id: None }),
        )
        .await;

        let (status, body) = error_envelope(result.err().unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "OpenAI API key not configured"}));
        assert_eq!(backend.calls_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found_client_still_answers_ok() {
        // The dispatcher reports the unmatched client inside the tool
        // result; the turn itself succeeds with model-composed text.
        let backend = Arc::new(ScriptedBackend::new(vec![
            BackendResponse::ToolCalls {
                calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "get_client_details".to_string(),
                    arguments: json!({"client_name": "Acme Corp"}),
                }],
                text: None,
                metrics: LlmMetrics::default(),
            },
            BackendResponse::Content {
                text: "I couldn't find a client named Acme Corp.".to_string(),
                metrics: LlmMetrics::default(),
            },
        ]));
        let state = test_state(backend, true);

        let result = chat(
            State(state.clone()),
            Json(ChatRequest {
                message: Some("Tell me about Acme Corp".to_string()),
                session_id: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.response, "I couldn't find a client named Acme Corp.");
        assert!(!result.session_id.is_empty());
        assert_eq!(state.sessions.history(&result.session_id).len(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_is_uniform_500() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let state = test_state(backend, true);

        let result = chat(
            State(state),
            Json(ChatRequest { message: Some("hello".to_string()), session_id: None }),
        )
        .await;

        let (status, body) = error_envelope(result.err().unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Failed to process chat message: "));
    }

    #[tokio::test]
    async fn test_supplied_session_id_accumulates_history() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            BackendResponse::Content { text: "First.".to_string(), metrics: LlmMetrics::default() },
            BackendResponse::Content { text: "Second.".to_string(), metrics: LlmMetrics::default() },
        ]));
        let state = test_state(backend, true);

        for expected in ["First.", "Second."] {
            let result = chat(
                State(state.clone()),
                Json(ChatRequest {
                    message: Some("hi".to_string()),
                    session_id: Some("s-42".to_string()),
                }),
            )
            .await
            .unwrap();
            assert_eq!(result.response, expected);
            assert_eq!(result.session_id, "s-42");
        }
        assert_eq!(state.sessions.history("s-42").len(), 4);
    }
}
