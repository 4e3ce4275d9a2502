use crate::processing::distance;
use crate::render::chart::Canvas;

/// Actions the chart window can request from the parent.
pub enum ChartAction {
    None,
    ExportImage,
}

/// The chart shown for one "Show graph" click. The canvas is a snapshot;
/// later edits to the series do not change it.
pub struct ChartWindowState {
    pub open: bool,
    pub canvas: Canvas,
    pub distance: f64,
    /// Screen rect of the painted canvas (set each frame for screenshot cropping).
    pub last_canvas_rect: Option<egui::Rect>,
}

impl ChartWindowState {
    pub fn new(canvas: Canvas, distance: f64) -> Self {
        Self {
            open: true,
            canvas,
            distance,
            last_canvas_rect: None,
        }
    }
}

pub fn show_chart_window(ctx: &egui::Context, state: &mut ChartWindowState) -> ChartAction {
    let mut action = ChartAction::None;
    let mut open = state.open;

    egui::Window::new("Time / speed chart")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(state.canvas.size, egui::Sense::hover());
            state.canvas.paint(&ui.painter_at(rect), rect.min);
            ui.painter().rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
                egui::StrokeKind::Outside,
            );
            state.last_canvas_rect = Some(rect);

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(distance::report(state.distance))
                        .strong()
                        .underline()
                        .size(16.0),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save as PNG").on_hover_text("Export the chart image").clicked() {
                        action = ChartAction::ExportImage;
                    }
                });
            });
        });

    state.open = open;
    action
}
