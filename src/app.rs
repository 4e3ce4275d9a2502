use eframe::egui;
use crate::data::file_task::{FileTask, TaskKind, TaskOutput, TaskSlot};
use crate::state::app_state::{AppState, VERSION};
use crate::state::settings::Settings;
use crate::ui::chart_window::{self, ChartAction, ChartWindowState};
use crate::ui::confirm_dialog::{self, ConfirmLoadState, DialogResult};
use crate::ui::input_panel::{self, InputPanelState, PanelAction};
use std::path::Path;
use std::sync::Arc;

/// A message shown in the footer until dismissed.
pub enum Notice {
    Info(String),
    Error(String),
}

/// The main application window.
pub struct SpeedMesApp {
    pub state: AppState,
    pub input: InputPanelState,
    /// Chart window opened by "Show graph".
    pub chart_window: Option<ChartWindowState>,
    /// Load waiting for overwrite confirmation.
    pub confirm_load: Option<ConfirmLoadState>,
    pub notice: Option<Notice>,
    /// Save or load in progress. While set, the series must not change.
    pending_task: TaskSlot,
    /// Set when a chart screenshot has been requested.
    pending_screenshot: bool,
}

impl SpeedMesApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::restore(cc.storage);
        let state = AppState::new(settings);

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.0),
        );
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(state.settings.theme.visuals());

        Self {
            state,
            input: InputPanelState::default(),
            chart_window: None,
            confirm_load: None,
            notice: None,
            pending_task: TaskSlot::default(),
            pending_screenshot: false,
        }
    }

    fn busy(&self) -> bool {
        self.pending_task.is_busy()
    }

    fn add_measurement(&mut self) {
        match self.state.add_from_input(&self.input.raw_time, &self.input.raw_speed) {
            Ok(m) => {
                tracing::info!("Added measurement t={} v={}", m.time(), m.speed());
                self.input.clear_inputs();
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!("Rejected measurement: {e}");
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn delete_selected(&mut self) {
        if self.input.selected_times.is_empty() {
            self.notice = Some(Notice::Info("Select at least one row to delete.".to_string()));
            return;
        }
        let removed = self.state.remove_times(&self.input.selected_times);
        self.input.retain_existing(&self.state.series);
        tracing::info!("Removed {removed} measurement(s)");
    }

    fn show_graph(&mut self) {
        if !self.state.can_chart() {
            self.notice = Some(Notice::Info(
                "At least two measurements are needed to show the graph and compute the distance."
                    .to_string(),
            ));
            return;
        }
        self.chart_window = Some(ChartWindowState::new(
            self.state.render_chart(),
            self.state.total_distance(),
        ));
    }

    /// Ask for a target file and start writing it in the background.
    fn save_dialog(&mut self) {
        if self.busy() {
            return;
        }
        if self.state.series.is_empty() {
            self.notice = Some(Notice::Info("There are no measurements to save.".to_string()));
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Save measurements")
            .set_file_name("measurements.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        {
            let series = &self.state.series;
            if let Err(e) = self.pending_task.start(|| FileTask::save(&path, series)) {
                tracing::warn!("Save refused: {e}");
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    /// Ask for a source file, confirming first if it would replace data.
    fn load_dialog(&mut self) {
        if self.busy() {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Load measurements")
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            if self.state.load_needs_confirmation() {
                self.confirm_load = Some(ConfirmLoadState { path });
            } else {
                self.start_load(&path);
            }
        }
    }

    fn start_load(&mut self, path: &Path) {
        if let Err(e) = self.pending_task.start(|| FileTask::load(path)) {
            tracing::warn!("Load refused: {e}");
            self.notice = Some(Notice::Error(e.to_string()));
        }
    }

    /// Apply the result of a finished file task, if any.
    fn poll_task(&mut self) {
        let Some((task, result)) = self.pending_task.poll() else {
            return;
        };
        let path = task.path;

        match result {
            Ok(TaskOutput::Loaded(items)) => {
                let count = items.len();
                self.state.series.replace_all(items);
                self.input.retain_existing(&self.state.series);
                tracing::info!("Loaded {count} measurement(s) from {:?}", path);
                self.notice = Some(Notice::Info(format!("Loaded {count} measurement(s).")));
            }
            Ok(TaskOutput::Saved) => {
                tracing::info!("Saved measurements to {:?}", path);
                self.notice = Some(Notice::Info("Measurements saved.".to_string()));
            }
            Err(e) => {
                tracing::error!("File operation failed: {e}");
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    /// Crop a finished screenshot to the chart and write it as PNG.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });
        let Some(color_image) = screenshot_image else {
            return;
        };
        self.pending_screenshot = false;

        let Some(rect) = self.chart_window.as_ref().and_then(|w| w.last_canvas_rect) else {
            return;
        };
        let ppp = ctx.pixels_per_point();
        let full_w = color_image.width();
        let full_h = color_image.height();
        let x0 = ((rect.left() * ppp) as usize).min(full_w);
        let y0 = ((rect.top() * ppp) as usize).min(full_h);
        let x1 = ((rect.right() * ppp).ceil() as usize).min(full_w);
        let y1 = ((rect.bottom() * ppp).ceil() as usize).min(full_h);
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for row in y0..y1 {
            for col in x0..x1 {
                let c = color_image.pixels[row * full_w + col];
                rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("chart.png")
            .add_filter("PNG Image", &["png"])
            .save_file()
        {
            self.save_png(&path, width as u32, height as u32, rgba);
        }
    }

    fn save_png(&mut self, path: &Path, width: u32, height: u32, rgba: Vec<u8>) {
        let Some(img) = image::RgbaImage::from_raw(width, height, rgba) else {
            self.notice = Some(Notice::Error("Chart capture was empty.".to_string()));
            return;
        };
        match img.save(path) {
            Ok(()) => {
                tracing::info!("Saved chart image to {:?}", path);
                self.notice = Some(Notice::Info("Chart image saved.".to_string()));
            }
            Err(e) => {
                tracing::error!("Failed to save chart image: {e}");
                self.notice = Some(Notice::Error(format!("Failed to save image: {e}")));
            }
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) -> Option<PanelAction> {
        let mut action = None;
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.add(egui::Button::new("Load").shortcut_text("Ctrl+L")).clicked() {
                    action = Some(PanelAction::Load);
                    ui.close_menu();
                }
                if ui.add(egui::Button::new("Save").shortcut_text("Ctrl+S")).clicked() {
                    action = Some(PanelAction::Save);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.menu_button("Settings", |ui| {
                ui.checkbox(&mut self.state.settings.confirm_overwrite, "Confirm before overwrite");
                ui.separator();
                let theme = self.state.settings.theme;
                if ui.button(format!("{} theme", theme.toggle().label())).clicked() {
                    self.state.settings.theme = theme.toggle();
                    ui.close_menu();
                }
                ui.separator();
                ui.label("Chart");
                let chart = &mut self.state.settings.chart;
                ui.add(egui::DragValue::new(&mut chart.width).range(200.0..=2000.0).prefix("width: "));
                ui.add(egui::DragValue::new(&mut chart.height).range(150.0..=1500.0).prefix("height: "));
                ui.add(egui::DragValue::new(&mut chart.margin).range(20.0..=120.0).prefix("margin: "));
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(format!("v{VERSION}"));
            });
        });
        action
    }
}

impl eframe::App for SpeedMesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.settings.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Screenshot from previous frame, finished file tasks
        // ------------------------------------------------------------------
        if self.pending_screenshot {
            self.handle_screenshot(ctx);
        }
        self.poll_task();

        // ------------------------------------------------------------------
        // 1. Collect actions from shortcuts, menu and panel
        // ------------------------------------------------------------------
        let mut actions: Vec<PanelAction> = Vec::new();
        let load_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::L);
        let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
        if ctx.input_mut(|i| i.consume_shortcut(&load_shortcut)) {
            actions.push(PanelAction::Load);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&save_shortcut)) {
            actions.push(PanelAction::Save);
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            if let Some(action) = self.menu_bar(ui) {
                actions.push(action);
            }
        });

        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let count = self.state.series.len();
                    ui.label(egui::RichText::new(format!("{count} measurement(s)")).weak());
                    if let Some(notice) = &self.notice {
                        ui.separator();
                        match notice {
                            Notice::Info(msg) => ui.label(msg),
                            Notice::Error(msg) => ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg),
                        };
                        if ui.small_button("dismiss").clicked() {
                            self.notice = None;
                        }
                    }
                });
            });

        let busy = self.busy();
        egui::CentralPanel::default().show(ctx, |ui| {
            let action = input_panel::show_input_panel(&mut self.input, &self.state.series, ui, busy);
            if action != PanelAction::None {
                actions.push(action);
            }
        });

        // ------------------------------------------------------------------
        // 2. Process collected actions
        // ------------------------------------------------------------------
        for action in actions {
            match action {
                PanelAction::Add => self.add_measurement(),
                PanelAction::DeleteSelected => self.delete_selected(),
                PanelAction::ShowGraph => self.show_graph(),
                PanelAction::Save => self.save_dialog(),
                PanelAction::Load => self.load_dialog(),
                PanelAction::None => {}
            }
        }

        // ------------------------------------------------------------------
        // 3. Confirmation dialog
        // ------------------------------------------------------------------
        if let Some(ref confirm) = self.confirm_load {
            match confirm_dialog::show_confirm_dialog(ctx, confirm, self.busy()) {
                Some(DialogResult::Ok) => {
                    if let Some(confirm) = self.confirm_load.take() {
                        self.start_load(&confirm.path);
                    }
                }
                Some(DialogResult::Cancel) => {
                    self.confirm_load = None;
                }
                None => {}
            }
        }

        // ------------------------------------------------------------------
        // 4. Chart window
        // ------------------------------------------------------------------
        if let Some(ref mut window) = self.chart_window {
            if let ChartAction::ExportImage = chart_window::show_chart_window(ctx, window) {
                self.pending_screenshot = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            if !window.open {
                self.chart_window = None;
            }
        }

        // Show progress while a file task runs.
        if let Some(task) = self.pending_task.current() {
            let label = match task.kind {
                TaskKind::Load => "Loading measurements...",
                TaskKind::Save => "Saving measurements...",
            };
            egui::Window::new("Working")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(label);
                    });
                });
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.state.settings.persist(storage);
    }
}
