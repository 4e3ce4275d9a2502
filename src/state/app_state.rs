use crate::error::Result;
use crate::processing::distance;
use crate::render::chart::{self, Canvas};
use crate::state::measurement::{parse_measurement, Measurement};
use crate::state::series::MeasurementSeries;
use crate::state::settings::Settings;

pub const VERSION: &str = "0.1.0";

/// Charting and distance both need at least this many points.
pub const MIN_POINTS_FOR_CHART: usize = 2;

/// Sole owner of the measurement series. Every mutation goes through the
/// series' validated operations.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub series: MeasurementSeries,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            series: MeasurementSeries::new(),
            settings,
        }
    }

    /// Validate the raw input row and insert it.
    pub fn add_from_input(&mut self, raw_time: &str, raw_speed: &str) -> Result<Measurement> {
        let measurement = parse_measurement(raw_time, raw_speed)?;
        self.series.insert(measurement)?;
        Ok(measurement)
    }

    /// Remove every measurement at any of the given times.
    pub fn remove_times(&mut self, times: &[f64]) -> usize {
        times.iter().map(|&t| self.series.remove_by_time(t)).sum()
    }

    /// Whether loading a file should first ask the user.
    pub fn load_needs_confirmation(&self) -> bool {
        self.settings.confirm_overwrite && !self.series.is_empty()
    }

    pub fn can_chart(&self) -> bool {
        self.series.len() >= MIN_POINTS_FOR_CHART
    }

    pub fn total_distance(&self) -> f64 {
        distance::total_distance(self.series.snapshot())
    }

    pub fn render_chart(&self) -> Canvas {
        chart::render(
            self.series.snapshot(),
            &self.settings.chart,
            &self.settings.theme.chart_palette(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn end_to_end_insert_and_distance() {
        let mut state = AppState::default();
        state.add_from_input("1", "2").unwrap();
        state.add_from_input("0", "5").unwrap();
        state.add_from_input("3", "1").unwrap();

        let times: Vec<f64> = state.series.snapshot().iter().map(Measurement::time).collect();
        assert_eq!(times, vec![0.0, 1.0, 3.0]);
        assert!((state.total_distance() - 6.5).abs() < 1e-12);
        assert!(state.can_chart());
        assert_eq!(state.render_chart().disks().count(), 3);
    }

    #[test]
    fn rejected_input_leaves_series_alone() {
        let mut state = AppState::default();
        state.add_from_input("1", "2").unwrap();
        assert!(matches!(state.add_from_input("1", "9"), Err(Error::DuplicateTime { .. })));
        assert!(matches!(state.add_from_input("x", "9"), Err(Error::InvalidInput { .. })));
        assert_eq!(state.series.len(), 1);
        assert!(!state.can_chart());
    }

    #[test]
    fn remove_times_sums_removals() {
        let mut state = AppState::default();
        for (t, v) in [("0", "1"), ("1", "1"), ("2", "1")] {
            state.add_from_input(t, v).unwrap();
        }
        assert_eq!(state.remove_times(&[0.0, 2.0, 5.0]), 2);
        assert_eq!(state.series.len(), 1);
    }

    #[test]
    fn confirmation_only_when_enabled_and_non_empty() {
        let mut state = AppState::default();
        assert!(!state.load_needs_confirmation());
        state.add_from_input("0", "0").unwrap();
        assert!(state.load_needs_confirmation());
        state.settings.confirm_overwrite = false;
        assert!(!state.load_needs_confirmation());
    }
}
