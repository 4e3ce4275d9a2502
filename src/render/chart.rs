use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};

use crate::state::measurement::Measurement;
use crate::state::theme::ChartPalette;

pub const TIME_AXIS_LABEL: &str = "Time (s)";
pub const SPEED_AXIS_LABEL: &str = "Speed (m/s)";

/// Canvas geometry for the time/speed chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    /// Inset of the plot rectangle from every canvas edge.
    pub margin: f32,
    /// Number of grid intervals per axis; `grid_divisions + 1` lines are drawn.
    pub grid_divisions: usize,
    pub marker_radius: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 760.0,
            height: 500.0,
            margin: 60.0,
            grid_divisions: 10,
            marker_radius: 3.0,
        }
    }
}

/// One drawing primitive, in canvas coordinates (origin top-left, y down).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { from: Pos2, to: Pos2, stroke: Stroke },
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
    },
    Disk { center: Pos2, radius: f32, color: Color32 },
}

/// A rendered chart: a background fill plus shapes in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub size: Vec2,
    pub background: Color32,
    pub shapes: Vec<Shape>,
}

impl Canvas {
    /// Paint onto an egui painter with the canvas' top-left at `origin`.
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        painter.rect_filled(Rect::from_min_size(origin, self.size), 0.0, self.background);
        for shape in &self.shapes {
            match shape {
                Shape::Line { from, to, stroke } => {
                    painter.line_segment([*from + offset, *to + offset], *stroke);
                }
                Shape::Text { pos, anchor, text, size, color } => {
                    painter.text(*pos + offset, *anchor, text, FontId::proportional(*size), *color);
                }
                Shape::Disk { center, radius, color } => {
                    painter.circle_filled(*center + offset, *radius, *color);
                }
            }
        }
    }
}

#[cfg(test)]
impl Canvas {
    pub fn lines(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn disks(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Disk { center, .. } => Some(*center),
            _ => None,
        })
    }
}

/// Maps data coordinates onto the plot rectangle.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub rect: Rect,
    pub max_time: f64,
    pub max_speed: f64,
}

impl PlotArea {
    /// Scale both axes from zero to the data maximum. An empty series or a
    /// zero maximum is scaled to 1 so the grid still spans the whole rect.
    pub fn fit(measurements: &[Measurement], rect: Rect) -> Self {
        Self {
            rect,
            max_time: axis_max(measurements.iter().map(Measurement::time)),
            max_speed: axis_max(measurements.iter().map(Measurement::speed)),
        }
    }

    pub fn data_to_screen(&self, time: f64, speed: f64) -> Pos2 {
        Pos2::new(
            self.rect.left() + (time / self.max_time) as f32 * self.rect.width(),
            self.rect.bottom() - (speed / self.max_speed) as f32 * self.rect.height(),
        )
    }
}

fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Draw the time/speed chart for measurements in ascending time order.
///
/// Never fails: degenerate data is handled by [`PlotArea::fit`].
pub fn render(measurements: &[Measurement], config: &ChartConfig, palette: &ChartPalette) -> Canvas {
    let size = Vec2::new(config.width, config.height);
    let inner = Rect::from_min_size(Pos2::ZERO, size).shrink(config.margin);
    let area = PlotArea::fit(measurements, inner);
    let rect = area.rect;
    let mut shapes = Vec::new();

    let grid = Stroke::new(1.0, palette.grid);
    let divisions = config.grid_divisions.max(1);
    for i in 0..=divisions {
        let frac = i as f32 / divisions as f32;

        let x = rect.left() + frac * rect.width();
        shapes.push(Shape::Line {
            from: Pos2::new(x, rect.top()),
            to: Pos2::new(x, rect.bottom()),
            stroke: grid,
        });
        shapes.push(Shape::Text {
            pos: Pos2::new(x, rect.bottom() + 5.0),
            anchor: Align2::CENTER_TOP,
            text: format_tick(i as f64 * area.max_time / divisions as f64),
            size: 10.0,
            color: palette.text,
        });

        let y = rect.bottom() - frac * rect.height();
        shapes.push(Shape::Line {
            from: Pos2::new(rect.left(), y),
            to: Pos2::new(rect.right(), y),
            stroke: grid,
        });
        shapes.push(Shape::Text {
            pos: Pos2::new(rect.left() - 5.0, y),
            anchor: Align2::RIGHT_CENTER,
            text: format_tick(i as f64 * area.max_speed / divisions as f64),
            size: 10.0,
            color: palette.text,
        });
    }

    // Axes go over the grid.
    let axis = Stroke::new(1.5, palette.axis);
    shapes.push(Shape::Line { from: rect.left_bottom(), to: rect.right_bottom(), stroke: axis });
    shapes.push(Shape::Line { from: rect.left_top(), to: rect.left_bottom(), stroke: axis });
    shapes.push(Shape::Text {
        pos: Pos2::new(rect.right(), rect.bottom() + 40.0),
        anchor: Align2::RIGHT_TOP,
        text: TIME_AXIS_LABEL.to_string(),
        size: 12.0,
        color: palette.text,
    });
    shapes.push(Shape::Text {
        pos: Pos2::new(rect.left(), rect.top() - 40.0),
        anchor: Align2::CENTER_TOP,
        text: SPEED_AXIS_LABEL.to_string(),
        size: 12.0,
        color: palette.text,
    });

    let points: Vec<Pos2> = measurements
        .iter()
        .map(|m| area.data_to_screen(m.time(), m.speed()))
        .collect();

    let line = Stroke::new(1.5, palette.line);
    for pair in points.windows(2) {
        shapes.push(Shape::Line { from: pair[0], to: pair[1], stroke: line });
    }
    for &center in &points {
        shapes.push(Shape::Disk { center, radius: config.marker_radius, color: palette.marker });
    }

    Canvas { size, background: palette.background, shapes }
}

/// Tick label with one decimal, switching to scientific notation for
/// very large values.
pub fn format_tick(val: f64) -> String {
    if val.abs() >= 1e6 {
        format!("{val:.1e}")
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::theme::Theme;

    fn points(raw: &[(f64, f64)]) -> Vec<Measurement> {
        raw.iter()
            .map(|&(t, v)| Measurement::new(t, v).unwrap())
            .collect()
    }

    fn draw(raw: &[(f64, f64)]) -> Canvas {
        render(&points(raw), &ChartConfig::default(), &Theme::Light.chart_palette())
    }

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn plot_rect_is_inset_by_margin() {
        let area = PlotArea::fit(&[], Rect::from_min_size(Pos2::ZERO, Vec2::new(760.0, 500.0)).shrink(60.0));
        assert_eq!(area.rect.left(), 60.0);
        assert_eq!(area.rect.top(), 60.0);
        assert_eq!(area.rect.right(), 700.0);
        assert_eq!(area.rect.bottom(), 440.0);
    }

    #[test]
    fn maps_with_inverted_y() {
        let rect = Rect::from_min_max(Pos2::new(60.0, 60.0), Pos2::new(700.0, 440.0));
        let area = PlotArea::fit(&points(&[(0.0, 0.0), (10.0, 20.0)]), rect);
        assert!(approx(area.data_to_screen(0.0, 0.0), Pos2::new(60.0, 440.0)));
        assert!(approx(area.data_to_screen(10.0, 20.0), Pos2::new(700.0, 60.0)));
        assert!(approx(area.data_to_screen(5.0, 10.0), Pos2::new(380.0, 250.0)));
    }

    #[test]
    fn empty_series_draws_full_grid() {
        let canvas = draw(&[]);
        // 11 vertical + 11 horizontal grid lines and the 2 axes.
        assert_eq!(canvas.lines().count(), 24);
        assert_eq!(canvas.disks().count(), 0);
        let texts: Vec<&str> = canvas.texts().collect();
        assert!(texts.contains(&"1.0"));
        assert!(texts.contains(&TIME_AXIS_LABEL));
        assert!(texts.contains(&SPEED_AXIS_LABEL));
    }

    #[test]
    fn all_zero_speeds_substitute_unit_scale() {
        let canvas = draw(&[(0.0, 0.0), (4.0, 0.0)]);
        let texts: Vec<&str> = canvas.texts().collect();
        // Time axis tops out at 4, speed axis at the substituted 1.
        assert!(texts.contains(&"4.0"));
        assert!(texts.contains(&"0.5"));
        assert!(texts.contains(&"1.0"));
        for p in canvas.disks() {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert_eq!(p.y, 440.0);
        }
    }

    #[test]
    fn connects_consecutive_points_and_marks_each() {
        let canvas = draw(&[(0.0, 5.0), (1.0, 2.0), (3.0, 1.0)]);
        assert_eq!(canvas.lines().count(), 24 + 2);
        let disks: Vec<Pos2> = canvas.disks().collect();
        assert_eq!(disks.len(), 3);
        assert!(approx(disks[0], Pos2::new(60.0, 60.0)));
        assert!(approx(disks[2], Pos2::new(700.0, 440.0 - 380.0 / 5.0)));

        let data_lines: Vec<(Pos2, Pos2)> = canvas.lines().skip(24).collect();
        assert!(approx(data_lines[0].0, disks[0]));
        assert!(approx(data_lines[0].1, disks[1]));
        assert!(approx(data_lines[1].1, disks[2]));
    }

    #[test]
    fn single_point_has_marker_but_no_segment() {
        let canvas = draw(&[(2.0, 3.0)]);
        assert_eq!(canvas.lines().count(), 24);
        assert_eq!(canvas.disks().count(), 1);
    }

    #[test]
    fn markers_are_painted_last() {
        let canvas = draw(&[(0.0, 1.0), (1.0, 2.0)]);
        let last_two = &canvas.shapes[canvas.shapes.len() - 2..];
        assert!(last_two.iter().all(|s| matches!(s, Shape::Disk { .. })));
    }

    #[test]
    fn tick_labels_scale_with_maximum() {
        let canvas = draw(&[(0.0, 0.0), (20.0, 50.0)]);
        let texts: Vec<&str> = canvas.texts().collect();
        assert!(texts.contains(&"2.0"));
        assert!(texts.contains(&"20.0"));
        assert!(texts.contains(&"5.0"));
        assert!(texts.contains(&"50.0"));
    }

    #[test]
    fn format_tick_values() {
        assert_eq!(format_tick(0.0), "0.0");
        assert_eq!(format_tick(2.24), "2.2");
        assert_eq!(format_tick(1.5e7), "1.5e7");
    }
}
