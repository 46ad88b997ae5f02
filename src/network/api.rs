use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::common::{ApiResponse, Message, MessagePage, SendMessageRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("malformed response from server ({0})")]
    MalformedResponse(StatusCode),
}

impl ClientError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ClientError::Rejected { status, .. } if *status == StatusCode::BAD_REQUEST)
    }
}

/// HTTP client for the two chat endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    pub async fn fetch_messages(&self, cursor: Option<&str>) -> Result<MessagePage, ClientError> {
        let response = self
            .http
            .get(self.messages_url())
            .query(&[("lastMessageId", cursor.unwrap_or_default())])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn send_message(&self, username: &str, text: &str) -> Result<Message, ClientError> {
        let body = SendMessageRequest {
            username: username.to_string(),
            text: text.to_string(),
        };
        let response = self.http.post(self.messages_url()).json(&body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let envelope: ApiResponse<T> = response
        .json()
        .await
        .map_err(|_| ClientError::MalformedResponse(status))?;

    match envelope {
        ApiResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiResponse { success: true, .. } => Err(ClientError::MalformedResponse(status)),
        ApiResponse { error, .. } => Err(ClientError::Rejected {
            status,
            message: error.unwrap_or_else(|| "unknown error".to_string()),
        }),
    }
}
