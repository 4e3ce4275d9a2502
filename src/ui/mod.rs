pub mod chart_window;
pub mod confirm_dialog;
pub mod input_panel;
