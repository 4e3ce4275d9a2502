use std::path::PathBuf;

/// A load waiting for the user to accept replacing the current measurements.
pub struct ConfirmLoadState {
    pub path: PathBuf,
}

/// Result of the confirmation dialog interaction each frame.
pub enum DialogResult {
    Ok,
    Cancel,
}

/// Show the overwrite confirmation as a centered window.
///
/// Returns `Some(DialogResult)` when the user answers, or `None` while the
/// dialog is still open. "Yes" stays disabled while `busy`.
pub fn show_confirm_dialog(
    ctx: &egui::Context,
    state: &ConfirmLoadState,
    busy: bool,
) -> Option<DialogResult> {
    let mut result = None;
    let mut open = true;

    egui::Window::new("Confirm load")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Loading will replace the current measurement list. Continue?");
            ui.label(egui::RichText::new(state.path.display().to_string()).weak());
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        !busy,
                        egui::Button::new(egui::RichText::new("Yes").strong()).min_size(egui::vec2(80.0, 28.0)),
                    )
                    .clicked()
                {
                    result = Some(DialogResult::Ok);
                }
                if ui.add(egui::Button::new("No").min_size(egui::vec2(80.0, 28.0))).clicked() {
                    result = Some(DialogResult::Cancel);
                }
            });
        });

    if !open {
        result = Some(DialogResult::Cancel);
    }
    result
}
