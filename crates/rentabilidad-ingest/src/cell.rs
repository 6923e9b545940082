//! Cell coercion.
//!
//! Spreadsheets mix native dates, serial numbers and free text in the same
//! column. Every function here returns `None` for a value it cannot make
//! sense of; callers decide whether that is an error.

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day zero of the spreadsheet serial date system
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial of 9999-12-31, the last date spreadsheets can represent
const MAX_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Ambiguous numeric forms read month first: `04/03/2024` is April 3rd
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

/// Coerce a cell to a calendar date, dropping any time of day
pub fn to_date(cell: &Data) -> Option<NaiveDate> {
    to_datetime(cell).map(|dt| dt.date())
}

/// Coerce a cell to a date-time.
///
/// Accepts native date cells, numeric serial dates and ISO or month-first text.
pub fn to_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => from_serial(dt.as_f64()),
        Data::Float(f) => from_serial(*f),
        Data::Int(i) => from_serial(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_datetime_text(s),
        _ => None,
    }
}

/// Coerce a cell to a number. NaN counts as missing.
pub fn to_number(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::Bool(b) => f64::from(u8::from(*b)),
        Data::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (!value.is_nan()).then_some(value)
}

/// Coerce a cell to trimmed text; empty cells are missing
pub fn to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        other => {
            let text = other.to_string();
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

/// Whether a cell carries nothing at all
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_time(chrono::NaiveTime::MIN);
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
