//! Runtime settings for the guardpost agent, loaded from the environment.
//!
//! Tunables that the rest of the system treats as fixed constants live here:
//! the tool-loop iteration ceiling, the default lookback windows for shift
//! and incident queries, and the session TTL.

use std::env;

/// Errors raised while reading settings from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

/// Agent runtime settings.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Model identifier sent to the chat API.
    pub model: String,
    /// Optional API base URL for OpenAI-compatible endpoints.
    pub api_base: Option<String>,
    /// Maximum model-to-tool round trips per user message.
    pub max_tool_iterations: usize,
    /// Default lookback window for incident queries, in days.
    pub incident_lookback_days: i64,
    /// Default lookback window for shift history queries, in days.
    pub shift_lookback_days: i64,
    /// Idle time after which a session's history is dropped, in seconds.
    pub session_ttl_secs: u64,
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Enables the raw-SQL query tool instead of the fixed catalog.
    pub allow_raw_sql: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            max_tool_iterations: 10,
            incident_lookback_days: 7,
            shift_lookback_days: 30,
            session_ttl_secs: 1800,
            db_path: "data/guardpost.db".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            allow_raw_sql: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

impl AgentSettings {
    /// Loads settings from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            model: env::var("GUARDPOST_MODEL").unwrap_or(defaults.model),
            api_base: env::var("GUARDPOST_API_BASE").ok(),
            max_tool_iterations: parse_var(
                "GUARDPOST_MAX_TOOL_ITERATIONS",
                defaults.max_tool_iterations,
            )?,
            incident_lookback_days: parse_var(
                "GUARDPOST_INCIDENT_LOOKBACK_DAYS",
                defaults.incident_lookback_days,
            )?,
            shift_lookback_days: parse_var(
                "GUARDPOST_SHIFT_LOOKBACK_DAYS",
                defaults.shift_lookback_days,
            )?,
            session_ttl_secs: parse_var("GUARDPOST_SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            db_path: env::var("GUARDPOST_DB_PATH").unwrap_or(defaults.db_path),
            bind_addr: env::var("GUARDPOST_BIND_ADDR").unwrap_or(defaults.bind_addr),
            allow_raw_sql: env::var("GUARDPOST_ALLOW_RAW_SQL")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.allow_raw_sql),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AgentSettings::default();
        assert_eq!(settings.max_tool_iterations, 10);
        assert_eq!(settings.incident_lookback_days, 7);
        assert_eq!(settings.shift_lookback_days, 30);
        assert!(!settings.allow_raw_sql);
    }
}
