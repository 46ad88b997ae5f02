use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};

use super::components::{chat_area, input_bar, status_bar, username_modal};
use super::state::AppState;

/// Events arrive from the polling loop without user input, so keep repainting.
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
        username: Option<String>,
    ) -> Self {
        let mut app = Self {
            state: AppState::new(),
            command_sender,
            event_receiver,
        };
        if let Some(name) = username {
            app.activate(&name);
        }
        app
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn activate(&mut self, raw: &str) {
        if let Some(name) = self.state.set_username(raw) {
            self.send_command(NetworkCommand::SetUsername(name));
        }
    }

    fn submit_message(&mut self) {
        if let Some(text) = self.state.begin_send() {
            self.send_command(NetworkCommand::SendMessage(text));
        }
    }

    fn send_command(&mut self, command: NetworkCommand) {
        let activating = matches!(command, NetworkCommand::SetUsername(_));
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to polling loop: {err}");
            if activating {
                // The loop never saw the name, so it is still not polling.
                self.state.abort_activation();
            }
            self.state.sending = false;
            self.state.last_error = Some("Client is busy, try again".to_string());
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            if status_bar::render(ui, &self.state) {
                self.send_command(NetworkCommand::Refresh);
            }
        });

        egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
            let enabled = self.state.can_send();
            if input_bar::render(ui, &mut self.state.input_text, enabled) {
                self.submit_message();
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            chat_area::render(ui, &self.state);
        });

        if !self.state.is_active() && username_modal::render(ctx, &mut self.state.username_input) {
            let raw = self.state.username_input.clone();
            self.activate(&raw);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
