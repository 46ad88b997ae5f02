pub mod commands;
pub mod events;
pub mod types;

pub use commands::NetworkCommand;
pub use events::{ConnectionStatus, NetworkEvent};
pub use types::{ApiResponse, Message, MessagePage, SendMessageRequest};
