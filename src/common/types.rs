use serde::{Deserialize, Serialize};

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub username: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Body of `POST /messages`. Missing fields deserialize as empty strings and
/// are rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
}

/// Result of a cursor query: the new messages and the cursor to send next time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub last_message_id: Option<String>,
}

/// Envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_without_data_decodes() {
        let envelope: ApiResponse<Message> =
            serde_json::from_str(r#"{ "success": false, "error": "username and text are required" }"#)
                .unwrap();

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("username and text are required"));
    }

    #[test]
    fn success_envelope_without_error_decodes() {
        let envelope: ApiResponse<MessagePage> = serde_json::from_str(
            r#"{ "success": true, "data": { "messages": [], "lastMessageId": null } }"#,
        )
        .unwrap();

        assert!(envelope.success);
        assert!(envelope.error.is_none());
        assert_eq!(envelope.data, Some(MessagePage::default()));
    }
}
