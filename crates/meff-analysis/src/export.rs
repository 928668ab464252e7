use std::fs;
use std::path::Path;

use meff_core::errors::{ErrorInfo, MeffError};
use serde::Serialize;

use crate::report::SeriesPoint;
use crate::serde::to_canonical_json_bytes;

fn export_error(code: &str, err: impl ToString, path: &Path) -> MeffError {
    MeffError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}

/// Writes `time_slice,value,error` rows for plotting.
pub fn write_series_csv(path: &Path, points: &[SeriesPoint]) -> Result<(), MeffError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|err| export_error("csv-open", err, path))?;
    for point in points {
        wtr.serialize(point)
            .map_err(|err| export_error("csv-write", err, path))?;
    }
    wtr.flush().map_err(|err| export_error("csv-write", err, path))
}

/// Reads a `time_slice,value,error` CSV file.
pub fn read_series_csv(path: &Path) -> Result<Vec<SeriesPoint>, MeffError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|err| export_error("csv-open", err, path))?;
    let mut points = Vec::new();
    for (row, record) in rdr.deserialize::<SeriesPoint>().enumerate() {
        let point = record.map_err(|err| {
            export_error("csv-read", err, path).with_context("row", row + 1)
        })?;
        if !(point.value.is_finite() && point.error.is_finite() && point.error >= 0.0) {
            return Err(export_error("csv-read", "values must be finite with non-negative errors", path)
                .with_context("row", row + 1));
        }
        points.push(point);
    }
    Ok(points)
}

/// Writes a payload as canonical JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), MeffError> {
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(path, bytes).map_err(|err| export_error("json-write", err, path))
}
