use crate::error::{Error, Result};
use crate::state::measurement::Measurement;

/// Measurements kept in ascending time order.
///
/// Interactive inserts reject duplicate times. Bulk loads through
/// [`MeasurementSeries::replace_all`] only sort, so a file that repeats a
/// time keeps both rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSeries {
    items: Vec<Measurement>,
}

impl MeasurementSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the sorted position, or fail if the time is already present.
    pub fn insert(&mut self, measurement: Measurement) -> Result<()> {
        let time = measurement.time();
        // Binary search for the first element not earlier than `time`.
        let pos = self.items.partition_point(|m| m.time() < time);
        if self.items.get(pos).is_some_and(|m| m.time() == time) {
            return Err(Error::DuplicateTime { time });
        }
        self.items.insert(pos, measurement);
        Ok(())
    }

    /// Remove every measurement recorded at exactly `time`. Returns how many went.
    pub fn remove_by_time(&mut self, time: f64) -> usize {
        let before = self.items.len();
        self.items.retain(|m| m.time() != time);
        before - self.items.len()
    }

    pub fn snapshot(&self) -> &[Measurement] {
        &self.items
    }

    /// Swap in a whole new set of measurements, sorted by time.
    pub fn replace_all(&mut self, items: Vec<Measurement>) {
        let mut items = items;
        items.sort_by(|a, b| a.time().total_cmp(&b.time()));
        self.items = items;
    }

    pub fn contains_time(&self, time: f64) -> bool {
        self.items.iter().any(|m| m.time() == time)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Measurement> for MeasurementSeries {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        let mut series = Self::new();
        series.replace_all(iter.into_iter().collect());
        series
    }
}
