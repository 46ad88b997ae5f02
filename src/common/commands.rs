/// Lệnh UI gửi xuống polling loop.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Leaves the unauthenticated phase: fetch once now, then keep polling.
    SetUsername(String),
    /// Post a message as the current username.
    SendMessage(String),
    /// Poll immediately instead of waiting for the next tick.
    Refresh,
}
