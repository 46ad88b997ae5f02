use std::collections::HashSet;

use crate::common::{ConnectionStatus, Message, NetworkEvent};

/// Trạng thái cục bộ của UI.
pub struct AppState {
    pub messages: Vec<Message>,
    seen_ids: HashSet<String>,
    pub input_text: String,
    pub username_input: String,
    /// `None` until the user picks a display name; input stays disabled until then.
    pub username: Option<String>,
    pub status: ConnectionStatus,
    pub loading: bool,
    pub sending: bool,
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            seen_ids: HashSet::new(),
            input_text: String::new(),
            username_input: String::new(),
            username: None,
            status: ConnectionStatus::Idle,
            loading: false,
            sending: false,
            last_error: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.username.is_some()
    }

    /// Accepts a trimmed, non-empty name. Returns it when the caller should
    /// notify the polling loop.
    pub fn set_username(&mut self, raw: &str) -> Option<String> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        if !self.is_active() {
            self.loading = true;
        }
        self.username = Some(name.to_string());
        Some(name.to_string())
    }

    /// Returns to the unauthenticated phase after a name could not be handed
    /// to the polling loop.
    pub fn abort_activation(&mut self) {
        self.username = None;
        self.loading = false;
    }

    pub fn can_send(&self) -> bool {
        self.is_active() && !self.sending
    }

    /// Takes the trimmed input for sending and locks the input box.
    /// The box is cleared only once the server accepts the message.
    pub fn begin_send(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = self.input_text.trim();
        if text.is_empty() {
            return None;
        }
        self.sending = true;
        Some(text.to_string())
    }

    pub fn is_own(&self, message: &Message) -> bool {
        self.username.as_deref() == Some(message.username.as_str())
    }

    /// Appends messages in order, skipping ids already shown.
    pub fn push_messages(&mut self, messages: Vec<Message>) {
        for message in messages {
            if self.seen_ids.insert(message.id.clone()) {
                self.messages.push(message);
            }
        }
    }

    pub fn apply(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::MessagesReceived(messages) => self.push_messages(messages),
            NetworkEvent::Connectivity(status) => self.status = status,
            NetworkEvent::Loading(loading) => self.loading = loading,
            NetworkEvent::SendCompleted => {
                self.sending = false;
                self.last_error = None;
                self.input_text.clear();
            }
            NetworkEvent::SendFailed(reason) => {
                self.sending = false;
                self.last_error = Some(format!("Send failed: {reason}"));
            }
            NetworkEvent::CursorReset => {
                log::info!("Cursor reset by server; resynchronising history");
            }
        }
    }
}
