use std::sync::{Mutex, MutexGuard};

use crate::common::{Message, MessagePage};

use super::cursor::{self, CursorOptions};
use super::{MessageStore, StoreError, new_message};

/// Process-lifetime message store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<Message>>,
    options: CursorOptions,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CursorOptions) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            options,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Message>>, StoreError> {
        self.messages.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MessageStore for MemoryStore {
    fn append(&self, username: &str, text: &str) -> Result<Message, StoreError> {
        // Stamped under the lock so store order matches timestamp order.
        let mut messages = self.lock()?;
        let message = new_message(username, text);
        messages.push(message.clone());
        Ok(message)
    }

    fn list_since(&self, cursor: Option<&str>) -> Result<MessagePage, StoreError> {
        let messages = self.lock()?;
        cursor::select_since(&messages, cursor, self.options)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}
