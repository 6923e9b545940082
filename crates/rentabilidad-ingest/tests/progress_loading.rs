//! Integration tests for the physical-progress loader

mod common;

use chrono::NaiveDate;
use common::*;
use pretty_assertions::assert_eq;
use rentabilidad_core::ProgressEntry;
use rentabilidad_ingest::{load_progress, IngestError, ProgressLayout};
use tempfile::TempDir;

const HEADERS: [&str; 2] = ["Fecha", "Avance Físico (%)"];

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn loads_dates_and_percentages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(
        &path,
        &HEADERS,
        &[
            vec![date(2024, 3, 10), num(12.5)],
            vec![text("2024-03-17"), num(30.0)],
        ],
    );

    let entries = load_progress(&path, &ProgressLayout::default()).unwrap();

    assert_eq!(
        entries,
        vec![
            ProgressEntry::on(ymd(2024, 3, 10), 12.5),
            ProgressEntry::on(ymd(2024, 3, 17), 30.0),
        ]
    );
}

#[test]
fn non_numeric_percentage_is_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(&path, &HEADERS, &[vec![date(2024, 3, 10), text("s/d")]]);

    let entries = load_progress(&path, &ProgressLayout::default()).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].percent, None);
}

#[test]
fn unparseable_date_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(
        &path,
        &HEADERS,
        &[vec![date(2024, 3, 10), num(5.0)], vec![text("semana 2"), num(9.0)]],
    );

    let err = load_progress(&path, &ProgressLayout::default()).unwrap_err();

    match err {
        IngestError::InvalidDate { column, row, value } => {
            assert_eq!(column, "Fecha");
            assert_eq!(row, 3);
            assert_eq!(value, "semana 2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_dates_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(
        &path,
        &HEADERS,
        &[vec![Value::Empty, num(5.0)], vec![date(2024, 3, 17), num(9.0)]],
    );

    let entries = load_progress(&path, &ProgressLayout::default()).unwrap();

    assert_eq!(entries, vec![ProgressEntry::on(ymd(2024, 3, 17), 9.0)]);
}

#[test]
fn missing_percentage_column_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(&path, &["Fecha", "Avance"], &[vec![date(2024, 3, 10), num(5.0)]]);

    let err = load_progress(&path, &ProgressLayout::default()).unwrap_err();

    assert!(err.to_string().contains("Avance Físico (%)"));
}

#[test]
fn named_sheet_must_exist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(&path, &HEADERS, &[]);

    let layout = ProgressLayout {
        sheet: Some("Semanal".into()),
        ..ProgressLayout::default()
    };
    let err = load_progress(&path, &layout).unwrap_err();

    assert!(matches!(err, IngestError::SheetNotFound { .. }));
}

#[test]
fn text_dates_are_read_month_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(&path, &HEADERS, &[vec![text("03/10/2024"), num(25.0)]]);

    let entries = load_progress(&path, &ProgressLayout::default()).unwrap();

    assert_eq!(entries, vec![ProgressEntry::on(ymd(2024, 3, 10), 25.0)]);
}

#[test]
fn day_first_date_past_the_twelfth_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avance.xlsx");
    write_progress(&path, &HEADERS, &[vec![text("17/03/2024"), num(25.0)]]);

    let err = load_progress(&path, &ProgressLayout::default()).unwrap_err();

    assert!(matches!(err, IngestError::InvalidDate { row: 2, .. }));
}
