use chrono::{DateTime, Local, Utc};
use eframe::egui::{self, Color32, RichText};

use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.messages.is_empty() {
                ui.label(RichText::new("No messages yet").weak());
                return;
            }

            for message in &state.messages {
                // Tin nhắn của mình được tô màu khác
                let name_color = if state.is_own(message) {
                    Color32::LIGHT_BLUE
                } else {
                    Color32::LIGHT_GRAY
                };

                ui.horizontal(|ui| {
                    ui.label(RichText::new(message.username.as_str()).strong().color(name_color));
                    ui.label(RichText::new(format_time(message.timestamp)).weak());
                });
                // Plain label: user text is never interpreted as markup.
                ui.label(message.text.as_str());
                ui.add_space(4.0);
            }
        });
}

/// Local `HH:MM` for an epoch-millisecond timestamp.
pub fn format_time(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|time| time.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
