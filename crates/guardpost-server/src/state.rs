//! Shared server state.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use guardpost_agent::{ConversationDriver, SessionStore, RAW_SQL_SYSTEM_PROMPT, SYSTEM_PROMPT};
use guardpost_config::AgentSettings;
use guardpost_db::WorkforceStore;
use guardpost_llm::LlmClient;
use guardpost_tools::{fixed_catalog, raw_sql_catalog, LookbackDefaults, ToolDispatcher};
use tracing::{info, warn};

pub struct AppState {
    pub driver: ConversationDriver,
    pub sessions: SessionStore,
    pub api_key_configured: bool,
}

impl AppState {
    pub fn new(settings: &AgentSettings) -> anyhow::Result<Self> {
        let store = Arc::new(WorkforceStore::open(&settings.db_path)?);
        store.seed_if_empty()?;

        let dispatcher = ToolDispatcher::new(
            store,
            LookbackDefaults {
                incident_days: settings.incident_lookback_days,
                shift_days: settings.shift_lookback_days,
            },
            settings.allow_raw_sql,
        );

        // The raw-SQL catalog replaces the fixed one; its prompt teaches
        // the model the schema instead of the function list.
        let (catalog, system_prompt) = if settings.allow_raw_sql {
            warn!("raw SQL tool enabled, fixed-function catalog disabled");
            (raw_sql_catalog(), RAW_SQL_SYSTEM_PROMPT)
        } else {
            (fixed_catalog(), SYSTEM_PROMPT)
        };
        info!("Advertising {} tools to the model", catalog.len());

        let backend = Arc::new(LlmClient::new(&settings.model, settings.api_base.as_deref()));
        let driver = ConversationDriver::new(
            backend,
            dispatcher,
            catalog,
            system_prompt,
            settings.max_tool_iterations,
        );

        let api_key_configured =
            settings.api_base.is_some() || env::var("OPENAI_API_KEY").is_ok();
        if !api_key_configured {
            warn!("OPENAI_API_KEY not set, chat requests will be rejected");
        }

        Ok(Self {
            driver,
            sessions: SessionStore::new(Duration::from_secs(settings.session_ttl_secs)),
            api_key_configured,
        })
    }
}
