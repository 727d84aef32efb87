//! Field-list rendering and parsing.
//!
//! A field list is a `", "`-separated sequence of `prefix:value`
//! entries. The live form carries `x:`, `y:`, `z:`; the historical
//! form adds `fecha:` (capture date) and `hora:` (capture time).
//! `fecha`/`hora` are on-wire literals fixed by the protocol and must
//! not be renamed.
//!
//! Parsing keys off the literal prefixes, in any order. Missing
//! numeric fields default to 0 — lenient by design, observed peer
//! behavior. A present numeric field that fails integer parsing is a
//! malformed-field error; the caller drops that record and continues.

use triaxis_types::{Reading, Result, TriaxisError};

/// Separator between fields within one record.
pub const FIELD_SEPARATOR: &str = ", ";

/// Prefix of the capture-date field.
pub const DATE_PREFIX: &str = "fecha:";

/// Prefix of the capture-time field.
pub const TIME_PREFIX: &str = "hora:";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Renders the live field list: `x:<x>, y:<y>, z:<z>`.
pub fn render_live(reading: &Reading) -> String {
    format!("x:{}, y:{}, z:{}", reading.x, reading.y, reading.z)
}

/// Renders the historical record:
/// `x:<x>, y:<y>, z:<z>, fecha:<date>, hora:<time>`.
///
/// # Errors
///
/// Returns [`TriaxisError::MalformedField`] if the reading carries no
/// capture stamp; only stamped readings have a historical form.
pub fn render_historical(reading: &Reading) -> Result<String> {
    let capture = reading
        .captured_at
        .as_ref()
        .ok_or_else(|| TriaxisError::MalformedField {
            reason: "reading has no capture stamp to render".into(),
        })?;
    Ok(format!(
        "x:{}, y:{}, z:{}, {DATE_PREFIX}{}, {TIME_PREFIX}{}",
        reading.x, reading.y, reading.z, capture.date, capture.time
    ))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a live field list into an unstamped [`Reading`].
///
/// Fields may appear in any order; missing fields default to 0;
/// unknown prefixes are ignored.
///
/// # Errors
///
/// Returns [`TriaxisError::MalformedField`] if a present `x:`, `y:`,
/// or `z:` value is not a valid integer.
pub fn parse_live(body: &str) -> Result<Reading> {
    let (x, y, z, _, _) = parse_fields(body)?;
    Ok(Reading::live(x, y, z))
}

/// Parses one historical record segment into a stamped [`Reading`].
///
/// # Errors
///
/// Returns [`TriaxisError::MalformedField`] on an invalid integer or
/// when either `fecha:` or `hora:` is absent — a historical record
/// without both stamps is malformed.
pub fn parse_historical(segment: &str) -> Result<Reading> {
    let (x, y, z, date, time) = parse_fields(segment)?;
    match (date, time) {
        (Some(date), Some(time)) => Ok(Reading::historical(x, y, z, date, time)),
        _ => Err(TriaxisError::MalformedField {
            reason: format!("historical record missing fecha/hora: {segment:?}"),
        }),
    }
}

/// Shared field-list scan.
///
/// Returns `(x, y, z, date, time)` with numeric fields defaulted to 0
/// and stamps absent unless present in the input.
fn parse_fields(body: &str) -> Result<(i32, i32, i32, Option<String>, Option<String>)> {
    let mut x = 0;
    let mut y = 0;
    let mut z = 0;
    let mut date = None;
    let mut time = None;

    for part in body.split(FIELD_SEPARATOR) {
        if let Some(value) = part.strip_prefix("x:") {
            x = parse_int("x", value)?;
        } else if let Some(value) = part.strip_prefix("y:") {
            y = parse_int("y", value)?;
        } else if let Some(value) = part.strip_prefix("z:") {
            z = parse_int("z", value)?;
        } else if let Some(value) = part.strip_prefix(DATE_PREFIX) {
            date = Some(value.to_string());
        } else if let Some(value) = part.strip_prefix(TIME_PREFIX) {
            time = Some(value.to_string());
        }
        // Unknown prefixes are silently ignored.
    }

    Ok((x, y, z, date, time))
}

fn parse_int(field: &str, value: &str) -> Result<i32> {
    value.parse().map_err(|_| TriaxisError::MalformedField {
        reason: format!("field '{field}' is not an integer: {value:?}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_render_parse_roundtrip() -> Result<()> {
        let reading = Reading::live(101, -7, 0);
        let rendered = render_live(&reading);
        assert_eq!(rendered, "x:101, y:-7, z:0");
        assert_eq!(parse_live(&rendered)?, reading);
        Ok(())
    }

    #[test]
    fn historical_render_parse_roundtrip() -> Result<()> {
        let reading = Reading::historical(1, 2, 3, "2024-01-01", "10:00:00");
        let rendered = render_historical(&reading)?;
        assert_eq!(rendered, "x:1, y:2, z:3, fecha:2024-01-01, hora:10:00:00");
        assert_eq!(parse_historical(&rendered)?, reading);
        Ok(())
    }

    #[test]
    fn render_historical_requires_stamp() {
        let result = render_historical(&Reading::live(1, 2, 3));
        assert!(matches!(result, Err(TriaxisError::MalformedField { .. })));
    }

    #[test]
    fn field_order_is_irrelevant() -> Result<()> {
        assert_eq!(parse_live("y:5, x:3, z:9")?, parse_live("x:3, y:5, z:9")?);
        let shuffled = parse_historical("hora:10:00:00, z:3, fecha:2024-01-01, x:1, y:2")?;
        assert_eq!(
            shuffled,
            Reading::historical(1, 2, 3, "2024-01-01", "10:00:00")
        );
        Ok(())
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() -> Result<()> {
        let reading = parse_live("x:3, z:9")?;
        assert_eq!(reading, Reading::live(3, 0, 9));
        assert_eq!(parse_live("")?, Reading::live(0, 0, 0));
        Ok(())
    }

    #[test]
    fn unknown_prefixes_are_ignored() -> Result<()> {
        let reading = parse_live("x:1, w:999, y:2, unknown, z:3")?;
        assert_eq!(reading, Reading::live(1, 2, 3));
        Ok(())
    }

    #[test]
    fn bad_integer_is_malformed() {
        assert!(matches!(
            parse_live("x:abc, y:2, z:3"),
            Err(TriaxisError::MalformedField { .. })
        ));
        assert!(matches!(
            parse_historical("x:1, y:2, z:nope, fecha:2024-01-01, hora:10:00:00"),
            Err(TriaxisError::MalformedField { .. })
        ));
    }

    #[test]
    fn historical_missing_stamp_is_malformed() {
        assert!(parse_historical("x:1, y:2, z:3").is_err());
        assert!(parse_historical("x:1, y:2, z:3, fecha:2024-01-01").is_err());
        assert!(parse_historical("x:1, y:2, z:3, hora:10:00:00").is_err());
    }

    #[test]
    fn time_value_with_colons_survives() -> Result<()> {
        // `hora:10:00:00` must strip only the field prefix, keeping the
        // colons inside the value.
        let reading = parse_historical("x:1, y:2, z:3, fecha:2024-01-01, hora:23:59:59")?;
        assert_eq!(reading.captured_at.unwrap().time, "23:59:59");
        Ok(())
    }

    #[test]
    fn negative_values_roundtrip() -> Result<()> {
        let reading = Reading::live(-101, -1, i32::MIN);
        assert_eq!(parse_live(&render_live(&reading))?, reading);
        Ok(())
    }
}
