use std::path::Path;

use crate::error::{Error, Result};
use crate::state::measurement::{parse_measurement, Measurement};
use crate::state::series::MeasurementSeries;

/// Header line written to every saved file. Kept byte-for-byte for older files.
pub const HEADER: &str = "Idő,Sebesség";

/// Serialize the series as `time,speed` rows under [`HEADER`].
pub fn encode(series: &MeasurementSeries) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + series.len() * 16);
    out.push_str(HEADER);
    out.push('\n');
    for m in series.snapshot() {
        // `Display` for f64 is locale-independent and round-trips exactly.
        out.push_str(&format!("{},{}\n", m.time(), m.speed()));
    }
    out
}

/// Parse CSV text into measurements, in file order.
///
/// The first line is dropped without looking at it. Any later row that does
/// not hold exactly two non-negative finite numbers is skipped. Quotes have
/// no special meaning, so a stray `"` only spoils its own row.
pub fn decode(text: &str) -> Vec<Measurement> {
    // `\n`, `\r\n` and a lone `\r` all end the header line.
    let body = match text.find(['\n', '\r']) {
        Some(end) => &text[end + 1..],
        None => return Vec::new(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut measurements = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Skipping unreadable row {}: {e}", row + 2);
                continue;
            }
        };
        let (Some(time), Some(speed), None) = (record.get(0), record.get(1), record.get(2)) else {
            tracing::debug!("Skipping row {} with {} fields", row + 2, record.len());
            continue;
        };
        match parse_measurement(time, speed) {
            Ok(m) => measurements.push(m),
            Err(e) => tracing::debug!("Skipping row {}: {e}", row + 2),
        }
    }
    measurements
}

/// Read and decode a CSV file.
pub fn read_file(path: &Path) -> Result<Vec<Measurement>> {
    let content = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Fall back to latin1 so files saved by other tools still load.
    let text = match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    Ok(decode(&text))
}

/// Encode the series and write it to `path`, replacing any existing file.
pub fn write_file(path: &Path, series: &MeasurementSeries) -> Result<()> {
    std::fs::write(path, encode(series)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
