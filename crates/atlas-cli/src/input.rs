//! Scanner report parser.
//!
//! Reports are blocks separated by blank lines.  The first line of a block
//! names the scanner (the first integer token is its id); every following
//! line is one beacon as `x,y,z`:
//!
//! ```text
//! --- scanner 0 ---
//! 404,-588,-901
//! 528,-643,409
//!
//! --- scanner 1 ---
//! 686,422,578
//! ```

use atlas_types::{MAX_COORDINATE, ScannerId, ScannerReport, Vector3};
use thiserror::Error;

/// Why a report could not be read.  Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input contains no scanner reports")]
    Empty,

    #[error("line {line}: expected a scanner header such as `--- scanner 0 ---`")]
    MissingHeader { line: usize },

    #[error("line {line}: scanner id `{value}` does not fit in 32 bits")]
    InvalidId { line: usize, value: String },

    #[error("line {line}: expected 3 comma-separated coordinates, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: `{value}` is not an integer coordinate")]
    Coordinate { line: usize, value: String },

    #[error("line {line}: coordinate `{value}` is outside the 32-bit range")]
    CoordinateRange { line: usize, value: i64 },
}

/// Parse every scanner block in `text`.
pub fn parse_reports(text: &str) -> Result<Vec<ScannerReport>, ParseError> {
    let mut reports = Vec::new();
    let mut current: Option<ScannerReport> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            reports.extend(current.take());
            continue;
        }

        if trimmed.starts_with("---") || current.is_none() {
            reports.extend(current.take());
            let id = header_id(trimmed, line)?;
            current = Some(ScannerReport {
                id,
                beacons: Vec::new(),
            });
            continue;
        }

        if let Some(report) = current.as_mut() {
            report.beacons.push(parse_beacon(trimmed, line)?);
        }
    }
    reports.extend(current.take());

    if reports.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(reports)
}

/// The first integer token of a header line.  Beacon lines are never
/// headers.
fn header_id(text: &str, line: usize) -> Result<ScannerId, ParseError> {
    let token = text
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .filter(|_| !text.contains(','))
        .ok_or(ParseError::MissingHeader { line })?;
    token
        .parse()
        .map(ScannerId)
        .map_err(|_| ParseError::InvalidId {
            line,
            value: token.to_string(),
        })
}

fn parse_beacon(text: &str, line: usize) -> Result<Vector3, ParseError> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, z] = fields[..] else {
        return Err(ParseError::FieldCount {
            line,
            found: fields.len(),
        });
    };
    let coordinate = |value: &str| {
        let parsed = value.parse::<i64>().map_err(|_| ParseError::Coordinate {
            line,
            value: value.to_string(),
        })?;
        if parsed.unsigned_abs() > MAX_COORDINATE.unsigned_abs() {
            return Err(ParseError::CoordinateRange {
                line,
                value: parsed,
            });
        }
        Ok(parsed)
    };
    Ok(Vector3::new(coordinate(x)?, coordinate(y)?, coordinate(z)?))
}
