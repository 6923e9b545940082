//! Workbook access shared by the loaders.
//!
//! Row and column positions are absolute sheet coordinates (0-based), so a
//! header at row 3 stays at row 3 regardless of how many leading rows the
//! sheet leaves empty.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use tracing::debug;

use crate::cell;
use crate::IngestError;

pub(crate) type Workbook = Sheets<BufReader<File>>;

/// Open any spreadsheet format calamine understands
pub(crate) fn open(path: &Path) -> Result<Workbook, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }
    open_workbook_auto(path).map_err(|e| IngestError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read a worksheet by name, or the first one when `name` is `None`
pub(crate) fn read_range(
    workbook: &mut Workbook,
    name: Option<&str>,
) -> Result<(String, Range<Data>), IngestError> {
    let available = workbook.sheet_names();
    let sheet = match name {
        Some(wanted) => available
            .iter()
            .find(|s| s.as_str() == wanted)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: wanted.to_string(),
                available: available.clone(),
            })?,
        None => available.first().cloned().ok_or(IngestError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| IngestError::Sheet {
            sheet: sheet.clone(),
            message: e.to_string(),
        })?;
    debug!(sheet = %sheet, start = ?range.start(), end = ?range.end(), "worksheet read");
    Ok((sheet, range))
}

/// A worksheet with its header row resolved to column positions
pub(crate) struct Table<'a> {
    range: &'a Range<Data>,
    header_row: u32,
    /// Absolute column of each requested header, in request order
    columns: Vec<u32>,
}

impl<'a> Table<'a> {
    /// Locate `headers` on `header_row`.
    ///
    /// Header cells are compared after trimming. Fails listing every
    /// requested header that is absent.
    pub(crate) fn locate(
        sheet: &str,
        range: &'a Range<Data>,
        header_row: u32,
        headers: &[&str],
    ) -> Result<Self, IngestError> {
        let missing_row = || IngestError::HeaderRowMissing {
            sheet: sheet.to_string(),
            row: header_row,
        };
        let (start, end) = range.start().zip(range.end()).ok_or_else(missing_row)?;
        if header_row < start.0 || header_row > end.0 {
            return Err(missing_row());
        }

        let found: Vec<(u32, String)> = (start.1..=end.1)
            .filter_map(|col| {
                range
                    .get_value((header_row, col))
                    .and_then(cell::to_text)
                    .map(|name| (col, name))
            })
            .collect();

        let mut columns = Vec::with_capacity(headers.len());
        let mut absent = Vec::new();
        for header in headers {
            match found.iter().find(|(_, name)| name == header.trim()) {
                Some((col, _)) => columns.push(*col),
                None => absent.push((*header).to_string()),
            }
        }
        if !absent.is_empty() {
            return Err(IngestError::MissingColumns {
                sheet: sheet.to_string(),
                columns: absent,
            });
        }

        Ok(Self {
            range,
            header_row,
            columns,
        })
    }

    /// Absolute sheet row index of every non-blank data row below the header
    pub(crate) fn data_rows(&self) -> impl Iterator<Item = u32> + '_ {
        let last = self.range.end().map_or(self.header_row, |(row, _)| row);
        (self.header_row + 1..=last).filter(move |row| {
            (0..self.columns.len()).any(|i| !cell::is_blank(self.cell(*row, i)))
        })
    }

    /// Cell of the `index`-th requested column on `row`
    pub(crate) fn cell(&self, row: u32, index: usize) -> &Data {
        static EMPTY: Data = Data::Empty;
        self.range
            .get_value((row, self.columns[index]))
            .unwrap_or(&EMPTY)
    }
}
