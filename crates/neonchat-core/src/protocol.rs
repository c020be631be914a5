use serde::{Deserialize, Serialize};

/// Request sent once per turn, right after the connection opens
///
/// Field names are dictated by the hosted service; the session identifier
/// travels as `chatId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(rename = "chatId")]
    pub session_id: String,
    pub app_id: String,
    pub system_prompt: String,
    pub message: String,
}

impl ChatRequest {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wire_field_names() {
        let request = ChatRequest {
            session_id: "s-1".to_string(),
            app_id: "word-almost".to_string(),
            system_prompt: "be nice".to_string(),
            message: "hello".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "chatId": "s-1",
                "appId": "word-almost",
                "systemPrompt": "be nice",
                "message": "hello",
            })
        );
    }
}
