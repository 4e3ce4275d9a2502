pub mod app_state;
pub mod measurement;
pub mod series;
pub mod settings;
pub mod theme;
