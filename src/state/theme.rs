use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Colors used by the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub background: Color32,
    pub axis: Color32,
    pub grid: Color32,
    pub text: Color32,
    pub line: Color32,
    pub marker: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn chart_palette(&self) -> ChartPalette {
        match self {
            Theme::Light => ChartPalette {
                background: Color32::WHITE,
                axis: Color32::BLACK,
                grid: Color32::from_rgb(211, 211, 211),
                text: Color32::BLACK,
                line: Color32::BLUE,
                marker: Color32::RED,
            },
            Theme::Dark => ChartPalette {
                background: Color32::from_rgb(20, 20, 20),
                axis: Color32::from_gray(220),
                grid: Color32::from_gray(70),
                text: Color32::from_gray(220),
                line: Color32::from_rgb(90, 150, 255),
                marker: Color32::from_rgb(255, 80, 80),
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
