mod app;
mod data;
mod error;
mod processing;
mod render;
mod state;
mod ui;

use app::SpeedMesApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Speed measurements")
            .with_inner_size([650.0, 600.0])
            .with_min_inner_size([620.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "speedmes",
        options,
        Box::new(|cc| Ok(Box::new(SpeedMesApp::new(cc)))),
    )
}
