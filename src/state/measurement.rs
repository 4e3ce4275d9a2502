use crate::error::{Error, Result};

/// A single (time, speed) sample. Both values are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    time: f64,
    speed: f64,
}

impl Measurement {
    /// Build a measurement from already-parsed numbers.
    pub fn new(time: f64, speed: f64) -> Result<Self> {
        check("time", time, || time.to_string())?;
        check("speed", speed, || speed.to_string())?;
        Ok(Self { time, speed })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

/// Parse and validate the two raw text fields of the input row.
pub fn parse_measurement(raw_time: &str, raw_speed: &str) -> Result<Measurement> {
    let time = parse_field("time", raw_time)?;
    let speed = parse_field("speed", raw_speed)?;
    Measurement::new(time, speed)
}

/// Parse one numeric field. Surrounding whitespace is ignored.
pub(crate) fn parse_field(field: &'static str, raw: &str) -> Result<f64> {
    let value = raw.trim().parse::<f64>().map_err(|_| Error::InvalidInput {
        field,
        value: raw.to_string(),
    })?;
    check(field, value, || raw.to_string())?;
    Ok(value)
}

fn check(field: &'static str, value: f64, raw: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput { field, value: raw() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        let m = parse_measurement("1.5", "20").unwrap();
        assert_eq!(m.time(), 1.5);
        assert_eq!(m.speed(), 20.0);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let m = parse_measurement(" 3 ", "\t4.25\n").unwrap();
        assert_eq!((m.time(), m.speed()), (3.0, 4.25));
    }

    #[test]
    fn zero_is_allowed() {
        assert!(parse_measurement("0", "0").is_ok());
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(
            parse_measurement("", "1"),
            Err(Error::InvalidInput { field: "time", .. })
        ));
        assert!(matches!(
            parse_measurement("1", "fast"),
            Err(Error::InvalidInput { field: "speed", .. })
        ));
    }

    #[test]
    fn rejects_negative_values() {
        assert!(matches!(
            parse_measurement("-1", "1"),
            Err(Error::InvalidInput { field: "time", .. })
        ));
        assert!(matches!(
            parse_measurement("1", "-0.5"),
            Err(Error::InvalidInput { field: "speed", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(parse_measurement("NaN", "1").is_err());
        assert!(parse_measurement("1", "inf").is_err());
        assert!(Measurement::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn error_message_names_the_field() {
        let err = parse_measurement("x", "1").unwrap_err();
        assert!(err.to_string().contains("time"));
    }
}
