//! Schedule sheet loader.
//!
//! The schedule workbook carries a title block above the table: the column
//! headers sit on sheet row 3 (0-based) and data starts right below. Six
//! columns are read; everything else on the sheet is ignored.

use std::path::Path;

use rentabilidad_core::ScheduleTask;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sheet::{self, Table};
use crate::{cell, IngestError};

/// Names of the six schedule columns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleColumns {
    pub code: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub cost: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            code: "Codigo".into(),
            description: "Descripción".into(),
            start: "Inicio".into(),
            end: "Fin".into(),
            duration: "Duración (días)".into(),
            cost: "Costo ($)".into(),
        }
    }
}

impl ScheduleColumns {
    fn as_array(&self) -> [&str; 6] {
        [
            self.code.as_str(),
            self.description.as_str(),
            self.start.as_str(),
            self.end.as_str(),
            self.duration.as_str(),
            self.cost.as_str(),
        ]
    }
}

/// Where the schedule table lives inside the workbook
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleLayout {
    /// Worksheet name
    pub sheet: String,
    /// Absolute 0-based row holding the column headers
    pub header_row: u32,
    pub columns: ScheduleColumns,
}

impl Default for ScheduleLayout {
    fn default() -> Self {
        Self {
            sheet: "Programación Chicalá".into(),
            header_row: 3,
            columns: ScheduleColumns::default(),
        }
    }
}

impl ScheduleLayout {
    /// Use a different worksheet
    pub fn sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Use a different header row
    pub fn header_row(mut self, row: u32) -> Self {
        self.header_row = row;
        self
    }
}

/// Load every task row from the schedule workbook at `path`.
///
/// Unparseable dates and numbers become missing fields. Fails when the
/// sheet, the header row or any of the six columns is absent.
pub fn load_schedule(
    path: impl AsRef<Path>,
    layout: &ScheduleLayout,
) -> Result<Vec<ScheduleTask>, IngestError> {
    let path = path.as_ref();
    let mut workbook = sheet::open(path)?;
    let (sheet, range) = sheet::read_range(&mut workbook, Some(layout.sheet.as_str()))?;
    let table = Table::locate(&sheet, &range, layout.header_row, &layout.columns.as_array())?;

    let tasks: Vec<ScheduleTask> = table
        .data_rows()
        .map(|row| ScheduleTask {
            code: cell::to_text(table.cell(row, 0)),
            description: cell::to_text(table.cell(row, 1)),
            start: cell::to_date(table.cell(row, 2)),
            end: cell::to_date(table.cell(row, 3)),
            duration_days: cell::to_number(table.cell(row, 4)),
            cost: cell::to_number(table.cell(row, 5)),
        })
        .collect();

    let undated = tasks.iter().filter(|t| t.start.is_none()).count();
    debug!(undated, "schedule rows without a start date");
    info!(path = %path.display(), tasks = tasks.len(), "schedule loaded");
    Ok(tasks)
}
