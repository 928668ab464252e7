use meff_core::errors::{ErrorInfo, MeffError};

fn line_error(code: &str, message: impl Into<String>, line: usize) -> MeffError {
    MeffError::Ingestion(ErrorInfo::new(code, message).with_context("line", line))
}

/// Extracts one value per time slice from the first `time_slices` lines of `text`.
///
/// Each line is split on whitespace and the value is read from the 0-based
/// `column`. Lines past `time_slices` are ignored. A blank line ends the
/// source, so it counts as a short file.
pub fn parse_correlator(text: &str, time_slices: usize, column: usize) -> Result<Vec<f64>, MeffError> {
    let mut values = Vec::with_capacity(time_slices);
    let mut lines = text.lines();
    for t in 0..time_slices {
        let line_no = t + 1;
        let line = match lines.next().map(str::trim) {
            Some(line) if !line.is_empty() => line,
            _ => {
                return Err(line_error(
                    "short-source",
                    format!("expected {time_slices} lines, found {t}"),
                    line_no,
                )
                .with_context("time_slices", time_slices));
            }
        };
        let Some(field) = line.split_whitespace().nth(column) else {
            return Err(line_error(
                "missing-column",
                format!("line has no column {column}"),
                line_no,
            )
            .with_context("column", column));
        };
        let value: f64 = field.parse().map_err(|_| {
            line_error("non-numeric", format!("cannot read `{field}` as a number"), line_no)
                .with_context("column", column)
        })?;
        if !value.is_finite() {
            return Err(line_error("non-finite-value", "value is not finite", line_no)
                .with_context("column", column));
        }
        values.push(value);
    }
    Ok(values)
}

/// Decodes raw entry bytes before handing them to [`parse_correlator`].
pub fn parse_bytes(bytes: &[u8], time_slices: usize, column: usize) -> Result<Vec<f64>, MeffError> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        MeffError::Ingestion(ErrorInfo::new("invalid-utf8", err.to_string()))
    })?;
    parse_correlator(text, time_slices, column)
}

/// Renders a configuration in the layout [`parse_correlator`] reads.
///
/// Column 0 holds the time slice unless the value lives there, the value sits
/// in `column` and the remaining columns are zero.
pub fn format_configuration(values: &[f64], column: usize) -> String {
    let mut out = String::new();
    for (t, value) in values.iter().enumerate() {
        let mut fields = vec!["0".to_string(); column + 2];
        fields[0] = t.to_string();
        fields[column] = format!("{value:e}");
        out.push_str(&fields.join(" "));
        out.push('\n');
    }
    out
}
