use eframe::egui::{self, Color32, RichText};

use crate::common::ConnectionStatus;
use crate::ui::state::AppState;

/// Returns `true` when the user asked for an immediate refresh.
pub fn render(ui: &mut egui::Ui, state: &AppState) -> bool {
    let mut refresh = false;
    ui.horizontal(|ui| {
        let (color, hint) = match state.status {
            ConnectionStatus::Connected => (Color32::GREEN, "Connected"),
            ConnectionStatus::Error => (Color32::RED, "Server unreachable"),
            ConnectionStatus::Idle => (Color32::GRAY, "Not connected yet"),
        };
        ui.colored_label(color, "●").on_hover_text(hint);
        ui.heading("Rust Poll Chat");
        ui.separator();

        match &state.username {
            Some(name) => ui.label(RichText::new(name.as_str()).strong()),
            None => ui.label(RichText::new("no display name").weak()),
        };

        if state.loading {
            ui.spinner();
        }

        if ui
            .add_enabled(state.is_active(), egui::Button::new("Refresh"))
            .clicked()
        {
            refresh = true;
        }
    });

    if let Some(error) = &state.last_error {
        ui.colored_label(Color32::RED, error.as_str());
    }
    refresh
}
