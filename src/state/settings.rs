use serde::{Deserialize, Serialize};

use crate::render::chart::ChartConfig;
use crate::state::theme::Theme;

/// User preferences that survive restarts. Measurements are never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask before a load replaces a non-empty series.
    pub confirm_overwrite: bool,
    pub theme: Theme,
    pub chart: ChartConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confirm_overwrite: true,
            theme: Theme::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Settings {
    /// Restore from eframe storage, falling back to defaults.
    pub fn restore(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|s| eframe::get_value::<Settings>(s, eframe::APP_KEY))
            .unwrap_or_default()
    }

    pub fn persist(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
