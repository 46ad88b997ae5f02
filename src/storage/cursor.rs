//! Retrieval cursor protocol.
//!
//! A cursor is the id of the last message a client has seen. Resolution is
//! by store position only: ids are opaque and never compared by value order.

use serde::{Deserialize, Serialize};

use crate::common::{Message, MessagePage};

use super::StoreError;

/// Number of messages returned to a client that has no cursor yet.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// What to do with a cursor that matches no stored message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCursorPolicy {
    /// Resend the whole store and let the client resynchronise from it.
    #[default]
    ReplayAll,
    /// Fail the query with [`StoreError::UnknownCursor`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    pub history_limit: usize,
    pub unknown_cursor: UnknownCursorPolicy,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            unknown_cursor: UnknownCursorPolicy::default(),
        }
    }
}

/// An empty cursor (`?lastMessageId=`) means the same as no cursor.
pub fn normalize(cursor: Option<&str>) -> Option<&str> {
    cursor.filter(|id| !id.is_empty())
}

/// Builds the response page. The new cursor is the last returned id, or the
/// caller's cursor when nothing new was returned.
pub fn into_page(messages: Vec<Message>, cursor: Option<&str>) -> MessagePage {
    let last_message_id = messages
        .last()
        .map(|message| message.id.clone())
        .or_else(|| cursor.map(str::to_owned));

    MessagePage {
        messages,
        last_message_id,
    }
}

/// Applies the cursor protocol to messages held in creation order.
pub fn select_since(
    messages: &[Message],
    cursor: Option<&str>,
    options: CursorOptions,
) -> Result<MessagePage, StoreError> {
    let Some(cursor) = normalize(cursor) else {
        let start = messages.len().saturating_sub(options.history_limit);
        return Ok(into_page(messages[start..].to_vec(), None));
    };

    match messages.iter().position(|message| message.id == cursor) {
        Some(index) => Ok(into_page(messages[index + 1..].to_vec(), Some(cursor))),
        None => match options.unknown_cursor {
            UnknownCursorPolicy::ReplayAll => Ok(into_page(messages.to_vec(), Some(cursor))),
            UnknownCursorPolicy::Reject => Err(StoreError::UnknownCursor(cursor.to_owned())),
        },
    }
}
