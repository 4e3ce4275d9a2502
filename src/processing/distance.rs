use crate::state::measurement::Measurement;

/// Distance travelled, integrating speed over time with the trapezoidal rule.
/// Expects `measurements` in ascending time order. Fewer than two points give 0.
pub fn total_distance(measurements: &[Measurement]) -> f64 {
    measurements
        .windows(2)
        .map(|w| {
            let (a, b) = (&w[0], &w[1]);
            (a.speed() + b.speed()) / 2.0 * (b.time() - a.time())
        })
        .sum()
}

/// Human-readable distance line for the chart window.
pub fn report(distance: f64) -> String {
    format!("Total distance travelled: {distance:.3} m")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(f64, f64)]) -> Vec<Measurement> {
        raw.iter()
            .map(|&(t, v)| Measurement::new(t, v).unwrap())
            .collect()
    }

    #[test]
    fn empty_and_single_point_are_zero() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(total_distance(&points(&[(4.0, 30.0)])), 0.0);
    }

    #[test]
    fn single_trapezoid() {
        assert_eq!(total_distance(&points(&[(0.0, 0.0), (2.0, 10.0)])), 10.0);
    }

    #[test]
    fn constant_speed_is_speed_times_duration() {
        let d = total_distance(&points(&[(1.0, 3.0), (2.0, 3.0), (5.0, 3.0)]));
        assert!((d - 12.0).abs() < 1e-12);
    }

    #[test]
    fn end_to_end_scenario() {
        let d = total_distance(&points(&[(0.0, 5.0), (1.0, 2.0), (3.0, 1.0)]));
        assert!((d - 6.5).abs() < 1e-12);
    }

    #[test]
    fn report_formats_metres() {
        assert_eq!(report(6.5), "Total distance travelled: 6.500 m");
    }
}
