//! Workbook builders for loader tests.

#![allow(dead_code)]

use std::path::Path;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

pub const SCHEDULE_SHEET: &str = "Programación Chicalá";

pub const SCHEDULE_HEADERS: [&str; 6] = [
    "Codigo",
    "Descripción",
    "Inicio",
    "Fin",
    "Duración (días)",
    "Costo ($)",
];

/// A cell to write
#[derive(Clone, Debug)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(u16, u8, u8),
    Empty,
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

pub fn date(y: u16, m: u8, d: u8) -> Value {
    Value::Date(y, m, d)
}

pub fn write_row(sheet: &mut Worksheet, row: u32, values: &[Value]) {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (col, value) in values.iter().enumerate() {
        let col = col as u16;
        match value {
            Value::Text(s) => {
                sheet.write_string(row, col, s.as_str()).unwrap();
            }
            Value::Number(n) => {
                sheet.write_number(row, col, *n).unwrap();
            }
            Value::Date(y, m, d) => {
                let dt = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                sheet.write_datetime_with_format(row, col, &dt, &date_format).unwrap();
            }
            Value::Empty => {}
        }
    }
}

/// Schedule workbook: title on row 0, headers on row 3, data from row 4
pub fn write_schedule(path: &Path, sheet_name: &str, headers: &[&str], rows: &[Vec<Value>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    sheet.write_string(0, 0, "Programación de obra").unwrap();
    sheet.write_string(1, 0, "Proyecto Chicalá").unwrap();
    let header_values: Vec<Value> = headers.iter().map(|h| text(h)).collect();
    write_row(sheet, 3, &header_values);
    for (i, row) in rows.iter().enumerate() {
        write_row(sheet, 4 + i as u32, row);
    }
    workbook.save(path).unwrap();
}

/// Progress workbook: headers on row 0, data from row 1
pub fn write_progress(path: &Path, headers: &[&str], rows: &[Vec<Value>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Avance").unwrap();
    let header_values: Vec<Value> = headers.iter().map(|h| text(h)).collect();
    write_row(sheet, 0, &header_values);
    for (i, row) in rows.iter().enumerate() {
        write_row(sheet, 1 + i as u32, row);
    }
    workbook.save(path).unwrap();
}
