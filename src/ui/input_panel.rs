use crate::state::series::MeasurementSeries;

/// Actions the main panel can request from the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Add,
    DeleteSelected,
    ShowGraph,
    Save,
    Load,
}

/// Text fields of the input row and the rows picked in the table.
#[derive(Debug, Default)]
pub struct InputPanelState {
    pub raw_time: String,
    pub raw_speed: String,
    /// Times of the selected rows. Stored by value so selection survives re-sorting.
    pub selected_times: Vec<f64>,
}

impl InputPanelState {
    pub fn clear_inputs(&mut self) {
        self.raw_time.clear();
        self.raw_speed.clear();
    }

    pub fn toggle(&mut self, time: f64) {
        if let Some(pos) = self.selected_times.iter().position(|&t| t == time) {
            self.selected_times.remove(pos);
        } else {
            self.selected_times.push(time);
        }
    }

    pub fn is_selected(&self, time: f64) -> bool {
        self.selected_times.contains(&time)
    }

    /// Forget selections whose rows no longer exist.
    pub fn retain_existing(&mut self, series: &MeasurementSeries) {
        self.selected_times.retain(|&t| series.contains_time(t));
    }
}

fn action_btn(ui: &mut egui::Ui, label: &str, fill: egui::Color32, enabled: bool) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(label).strong().color(egui::Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(150.0, 30.0));
    ui.add_enabled(enabled, btn)
}

/// Render the input row, the measurement table and the action buttons.
/// `busy` disables everything that would touch the series.
pub fn show_input_panel(
    state: &mut InputPanelState,
    series: &MeasurementSeries,
    ui: &mut egui::Ui,
    busy: bool,
) -> PanelAction {
    let mut action = PanelAction::None;

    // --- Input row ---
    ui.horizontal(|ui| {
        ui.label("Time (s):");
        let time_resp = ui.add(egui::TextEdit::singleline(&mut state.raw_time).desired_width(100.0));
        ui.add_space(12.0);
        ui.label("Speed (m/s):");
        let speed_resp = ui.add(egui::TextEdit::singleline(&mut state.raw_speed).desired_width(100.0));
        ui.add_space(12.0);

        let submitted = (time_resp.lost_focus() || speed_resp.lost_focus())
            && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if action_btn(ui, "Add measurement", egui::Color32::from_rgb(128, 0, 128), !busy).clicked()
            || (submitted && !busy)
        {
            action = PanelAction::Add;
        }
    });

    ui.add_space(8.0);

    // --- Table + side buttons ---
    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(420.0);
            show_table(state, series, ui);
        });
        ui.add_space(12.0);
        ui.vertical(|ui| {
            if action_btn(ui, "Delete selected", egui::Color32::from_rgb(205, 92, 92), !busy).clicked() {
                action = PanelAction::DeleteSelected;
            }
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!(
                    "{} measurement(s), {} selected",
                    series.len(),
                    state.selected_times.len()
                ))
                .weak(),
            );
        });
    });

    ui.add_space(8.0);

    // --- Bottom buttons ---
    ui.horizontal(|ui| {
        if action_btn(ui, "Show graph", egui::Color32::from_rgb(138, 43, 226), true).clicked() {
            action = PanelAction::ShowGraph;
        }
        if action_btn(ui, "Save", egui::Color32::from_rgb(60, 179, 113), !busy).clicked() {
            action = PanelAction::Save;
        }
        if action_btn(ui, "Load", egui::Color32::from_rgb(70, 110, 180), !busy).clicked() {
            action = PanelAction::Load;
        }
    });

    action
}

fn show_table(state: &mut InputPanelState, series: &MeasurementSeries, ui: &mut egui::Ui) {
    use egui_extras::{Column, TableBuilder};

    let rows = series.snapshot();
    let clicked_time: std::cell::Cell<Option<f64>> = std::cell::Cell::new(None);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::exact(200.0), 2)
        .min_scrolled_height(300.0)
        .max_scroll_height(300.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Time (s)");
            });
            header.col(|ui| {
                ui.strong("Speed (m/s)");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let m = rows[row.index()];
                let selected = state.is_selected(m.time());
                row.col(|ui| {
                    if ui.selectable_label(selected, m.time().to_string()).clicked() {
                        clicked_time.set(Some(m.time()));
                    }
                });
                row.col(|ui| {
                    if ui.selectable_label(selected, m.speed().to_string()).clicked() {
                        clicked_time.set(Some(m.time()));
                    }
                });
            });
        });

    if rows.is_empty() {
        ui.label(egui::RichText::new("No measurements yet.").weak());
    }

    if let Some(time) = clicked_time.get() {
        state.toggle(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::measurement::Measurement;

    #[test]
    fn toggle_selects_and_deselects() {
        let mut state = InputPanelState::default();
        state.toggle(1.5);
        state.toggle(2.0);
        assert!(state.is_selected(1.5));
        state.toggle(1.5);
        assert!(!state.is_selected(1.5));
        assert_eq!(state.selected_times, vec![2.0]);
    }

    #[test]
    fn retain_existing_drops_stale_selection() {
        let mut series = MeasurementSeries::new();
        series.insert(Measurement::new(1.0, 1.0).unwrap()).unwrap();
        let mut state = InputPanelState::default();
        state.toggle(1.0);
        state.toggle(9.0);
        state.retain_existing(&series);
        assert_eq!(state.selected_times, vec![1.0]);
    }

    #[test]
    fn clear_inputs_empties_fields() {
        let mut state = InputPanelState {
            raw_time: "1".into(),
            raw_speed: "2".into(),
            ..Default::default()
        };
        state.clear_inputs();
        assert!(state.raw_time.is_empty() && state.raw_speed.is_empty());
    }
}
