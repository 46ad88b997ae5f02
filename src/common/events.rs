use super::types::Message;

/// Reachability of the chat server as seen by the last request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No request has completed yet.
    Idle,
    Connected,
    Error,
}

/// Sự kiện từ polling loop gửi lên UI.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    MessagesReceived(Vec<Message>),
    Connectivity(ConnectionStatus),
    Loading(bool),
    /// The server accepted a message; the UI clears its input box.
    SendCompleted,
    SendFailed(String),
    /// The server rejected our cursor; the next page starts from the latest history.
    CursorReset,
}
