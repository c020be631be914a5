use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};
use crate::{
    DEFAULT_APP_ID, DEFAULT_ASSISTANT_NAME, DEFAULT_ENDPOINT, DEFAULT_GREETING_PROMPT, DEFAULT_STORAGE_KEY,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TIME_FORMAT,
};

/// Widget configuration supplied when the controller is constructed
///
/// Every field has a default, so a partial JSON document only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Streaming endpoint (`ws://` or `wss://`)
    pub endpoint: String,
    pub app_id: String,
    pub system_prompt: String,
    /// Sent instead of user text for the automatic first turn
    pub greeting_prompt: String,
    pub storage_key: String,
    /// Fixed session identifier; a UUID v4 is generated when absent
    pub session_id: Option<String>,
    /// chrono format string for message timestamps
    pub time_format: String,
    pub assistant_name: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting_prompt: DEFAULT_GREETING_PROMPT.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            session_id: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse a JSON document and validate it
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(ChatError::Config(format!(
                "endpoint must be a ws:// or wss:// URL, got '{}'",
                self.endpoint
            )));
        }
        if self.app_id.trim().is_empty() {
            return Err(ChatError::Config("app_id must not be empty".to_string()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ChatError::Config("storage_key must not be empty".to_string()));
        }
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(ChatError::Config(format!("invalid time_format '{}'", self.time_format)));
        }
        if let Some(id) = &self.session_id {
            if id.trim().is_empty() {
                return Err(ChatError::Config("session_id must not be blank when set".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.storage_key, "ceo-ai-chat-history");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            WidgetConfig::from_json_str(r#"{"endpoint":"ws://localhost:9000/chat","assistant_name":"Neon"}"#)
                .unwrap();

        assert_eq!(config.endpoint, "ws://localhost:9000/chat");
        assert_eq!(config.assistant_name, "Neon");
        assert_eq!(config.app_id, DEFAULT_APP_ID);
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn test_json_overrides() {
        let config = WidgetConfig::from_json_str(r#"{"session_id":"abc","storage_key":"k"}"#).unwrap();
        assert_eq!(config.session_id.as_deref(), Some("abc"));
        assert_eq!(config.storage_key, "k");
    }

    #[test]
    fn test_http_endpoint_is_rejected() {
        let err = WidgetConfig::from_json_str(r#"{"endpoint":"https://example.com"}"#).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_blank_storage_key_is_rejected() {
        let config = WidgetConfig {
            storage_key: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_time_format_is_rejected() {
        let err = WidgetConfig::from_json_str(r#"{"time_format":"%Q"}"#).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = WidgetConfig::from_json_str(r#"{"endpoint": "#).unwrap_err();
        assert!(matches!(err, ChatError::Serialization(_)));
    }
}
