use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::common::{ConnectionStatus, NetworkCommand, NetworkEvent};

use super::api::ApiClient;

/// Whether the loop has a username and is allowed to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientPhase {
    Unauthenticated,
    Active { username: String },
}

/// Timer-driven consumer of `GET /messages`.
///
/// Commands from the UI and poll ticks are handled one at a time, so two
/// retrievals never overlap and the cursor only moves forward in order.
pub struct PollingClient {
    api: ApiClient,
    poll_interval: Duration,
    phase: ClientPhase,
    cursor: Option<String>,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl PollingClient {
    pub fn new(
        api: ApiClient,
        poll_interval: Duration,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            api,
            poll_interval,
            phase: ClientPhase::Unauthenticated,
            cursor: None,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until the UI side drops its command sender.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!("Polling loop started against {}", self.api.base_url());

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    if let Some(command) = command {
                        self.handle_command(command, &mut ticker).await;
                    } else {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if matches!(self.phase, ClientPhase::Active { .. }) {
                        self.poll().await;
                    }
                }
            }
        }

        log::info!("Polling loop stopped");
    }

    async fn handle_command(&mut self, command: NetworkCommand, ticker: &mut Interval) {
        match command {
            NetworkCommand::SetUsername(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    log::warn!("Ignoring empty username");
                    return;
                }

                let was_active = matches!(self.phase, ClientPhase::Active { .. });
                self.phase = ClientPhase::Active { username: name };
                if was_active {
                    return;
                }

                log::info!("Username set; polling every {:?}", self.poll_interval);
                self.emit(NetworkEvent::Loading(true)).await;
                self.poll().await;
                self.emit(NetworkEvent::Loading(false)).await;
                ticker.reset();
            }
            NetworkCommand::SendMessage(text) => self.send(text.trim()).await,
            NetworkCommand::Refresh => {
                if matches!(self.phase, ClientPhase::Active { .. }) {
                    self.poll().await;
                }
            }
        }
    }

    async fn send(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let ClientPhase::Active { username } = &self.phase else {
            self.emit(NetworkEvent::SendFailed("set a username first".to_string()))
                .await;
            return;
        };

        // The sent message is not echoed locally; the next poll surfaces it.
        let event = match self.api.send_message(username, text).await {
            Ok(message) => {
                log::debug!("Message {} accepted", message.id);
                NetworkEvent::SendCompleted
            }
            Err(err) => {
                log::warn!("Failed to send message: {err}");
                NetworkEvent::SendFailed(err.to_string())
            }
        };
        self.emit(event).await;
    }

    async fn poll(&mut self) {
        let fetched = self.api.fetch_messages(self.cursor.as_deref()).await;
        let result = match fetched {
            Err(err) if err.is_bad_request() && self.cursor.is_some() => {
                log::warn!("Server rejected cursor {:?} ({err}); resyncing", self.cursor);
                self.cursor = None;
                self.emit(NetworkEvent::CursorReset).await;
                self.api.fetch_messages(None).await
            }
            other => other,
        };

        match result {
            Ok(page) => {
                if !page.messages.is_empty() {
                    self.emit(NetworkEvent::MessagesReceived(page.messages)).await;
                }
                self.cursor = page.last_message_id;
                self.emit(NetworkEvent::Connectivity(ConnectionStatus::Connected))
                    .await;
            }
            Err(err) => {
                log::warn!("Poll failed: {err}");
                self.emit(NetworkEvent::Connectivity(ConnectionStatus::Error))
                    .await;
            }
        }
    }

    async fn emit(&self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::debug!("UI no longer listening: {err:?}");
        }
    }
}
