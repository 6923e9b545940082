//! # rentabilidad-ingest
//!
//! Spreadsheet loaders for project schedules and physical-progress reports.
//!
//! This crate provides:
//! - Schedule sheet loading with a configurable header row and column names
//! - Progress report loading (date + percentage)
//! - Lenient cell coercion: unparseable values become missing, not errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use rentabilidad_ingest::{load_schedule, ScheduleLayout};
//!
//! let tasks = load_schedule("cronograma.xlsx", &ScheduleLayout::default())?;
//! println!("{} tasks", tasks.len());
//! # Ok::<(), rentabilidad_ingest::IngestError>(())
//! ```

pub mod cell;
pub mod progress;
pub mod schedule;
mod sheet;

pub use progress::{load_progress, ProgressLayout};
pub use schedule::{load_schedule, ScheduleColumns, ScheduleLayout};

use std::path::PathBuf;
use thiserror::Error;

/// Spreadsheet loading error
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Cannot open workbook {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Worksheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Workbook has no worksheets")]
    NoSheets,

    #[error("Cannot read worksheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("Worksheet '{sheet}' has no header row at row {row}")]
    HeaderRowMissing { sheet: String, row: u32 },

    #[error("Worksheet '{sheet}' is missing columns: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("Invalid date in column '{column}' at spreadsheet row {row}: '{value}'")]
    InvalidDate {
        column: String,
        row: u32,
        value: String,
    },
}
