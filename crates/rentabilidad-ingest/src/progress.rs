//! Physical-progress report loader.
//!
//! A plain table: headers on the first row, one row per reporting date.

use std::path::Path;

use rentabilidad_core::ProgressEntry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sheet::{self, Table};
use crate::{cell, IngestError};

/// Where the progress table lives inside the workbook
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressLayout {
    /// Worksheet name; the first sheet when `None`
    pub sheet: Option<String>,
    /// Absolute 0-based row holding the column headers
    pub header_row: u32,
    pub date_column: String,
    pub percent_column: String,
}

impl Default for ProgressLayout {
    fn default() -> Self {
        Self {
            sheet: None,
            header_row: 0,
            date_column: "Fecha".into(),
            percent_column: "Avance Físico (%)".into(),
        }
    }
}

/// Load every progress row from the workbook at `path`.
///
/// Rows with a blank date are skipped. A date that cannot be parsed is an
/// error; a percentage that cannot be parsed is kept as missing.
pub fn load_progress(
    path: impl AsRef<Path>,
    layout: &ProgressLayout,
) -> Result<Vec<ProgressEntry>, IngestError> {
    let path = path.as_ref();
    let mut workbook = sheet::open(path)?;
    let (sheet, range) = sheet::read_range(&mut workbook, layout.sheet.as_deref())?;
    let table = Table::locate(
        &sheet,
        &range,
        layout.header_row,
        &[layout.date_column.as_str(), layout.percent_column.as_str()],
    )?;

    let entries = table
        .data_rows()
        .filter(|row| !cell::is_blank(table.cell(*row, 0)))
        .map(|row| {
            let date_cell = table.cell(row, 0);
            let recorded_at =
                cell::to_datetime(date_cell).ok_or_else(|| IngestError::InvalidDate {
                    column: layout.date_column.clone(),
                    row: row + 1,
                    value: date_cell.to_string(),
                })?;
            Ok(ProgressEntry {
                recorded_at,
                percent: cell::to_number(table.cell(row, 1)),
            })
        })
        .collect::<Result<Vec<_>, IngestError>>()?;

    info!(path = %path.display(), entries = entries.len(), "progress report loaded");
    Ok(entries)
}
