use eframe::egui;

/// Centered prompt shown until a display name is chosen. Returns `true` on submit.
pub fn render(ctx: &egui::Context, username_input: &mut String) -> bool {
    let mut submit = false;
    egui::Window::new("Choose a display name")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let response = ui.text_edit_singleline(username_input);
            if ui.button("Join").clicked() {
                submit = true;
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
        });
    submit
}
