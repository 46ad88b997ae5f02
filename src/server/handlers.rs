use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::common::{ApiResponse, Message, MessagePage, SendMessageRequest};

use super::AppState;
use super::error::ApiError;

pub const MISSING_FIELDS: &str = "username and text are required";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    pub last_message_id: Option<String>,
}

/// `POST /messages`
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        log::debug!("Unreadable message body: {rejection}");
        ApiError::Validation(MISSING_FIELDS.to_string())
    })?;

    if request.username.is_empty() || request.text.is_empty() {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    }

    let message = state.store.append(&request.username, &request.text)?;
    log::info!("Stored message {} from {}", message.id, message.username);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// `GET /messages?lastMessageId=<id>`
pub async fn list_messages(
    State(state): State<AppState>,
    query: Option<Query<MessagesQuery>>,
) -> Result<Json<ApiResponse<MessagePage>>, ApiError> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let page = state.store.list_since(query.last_message_id.as_deref())?;

    log::debug!(
        "Cursor {:?} -> {} message(s), next cursor {:?}",
        query.last_message_id,
        page.messages.len(),
        page.last_message_id
    );
    Ok(Json(ApiResponse::ok(page)))
}
