//! Excel export of a cost report
//!
//! Two sheets:
//! - Curva Semanal: one row per week bucket with every series
//! - Cronograma: the loaded schedule with the derived cost per day
//!
//! ```text
//! Sheet: Curva Semanal
//! | Fecha      | Costo Semanal | Costo Acumulado | Ingreso Acumulado | Avance Físico (%) | Avance Real ($) |
//! |------------|---------------|-----------------|-------------------|-------------------|-----------------|
//! | 2024-03-10 | 600.00        | 600.00          | 0.00              | 40.0              | 360.00          |
//! | 2024-03-17 | 300.00        | 900.00          | 900.00            |                   |                 |
//! ```
//!
//! Missing values are left as blank cells so spreadsheet charts show gaps.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use rentabilidad_core::{CostReport, RenderError, Renderer};

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Currency label used in number formats
    pub currency: String,
    /// Whether to include the Cronograma sheet
    pub include_schedule: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            currency: "COP".into(),
            include_schedule: true,
        }
    }
}

struct ExcelFormats {
    header: Format,
    date: Format,
    currency: Format,
    percent: Format,
    number: Format,
    text: Format,
    blank: Format,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set currency label
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Leave out the Cronograma sheet
    pub fn no_schedule(mut self) -> Self {
        self.include_schedule = false;
        self
    }

    /// Render the report to an in-memory xlsx file
    pub fn render_to_bytes(&self, report: &CostReport) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        self.add_weekly_sheet(&mut workbook, report, &formats)?;
        if self.include_schedule {
            self.add_schedule_sheet(&mut workbook, report, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let date = Format::new()
            .set_num_format("yyyy-mm-dd")
            .set_border(FormatBorder::Thin);

        let currency = Format::new()
            .set_num_format(&format!("#,##0.00 \"{}\"", self.currency))
            .set_border(FormatBorder::Thin);

        let percent = Format::new()
            .set_num_format("0.0")
            .set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format("#,##0.##")
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);
        let blank = Format::new().set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            date,
            currency,
            percent,
            number,
            text,
            blank,
        }
    }

    fn add_weekly_sheet(
        &self,
        workbook: &mut Workbook,
        report: &CostReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Curva Semanal")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let headers = [
            "Fecha",
            "Costo Semanal",
            "Costo Acumulado",
            "Ingreso Acumulado",
            "Avance Físico (%)",
            "Avance Real ($)",
        ];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 12).ok();
        for col in 1..headers.len() as u16 {
            sheet.set_column_width(col, 20).ok();
        }

        for (i, week) in report.weekly.iter().enumerate() {
            let row = i as u32 + 1;
            write_date(sheet, row, 0, Some(week.week_ending), formats)?;
            write_value(sheet, row, 1, Some(week.periodic_cost), &formats.currency, formats)?;
            write_value(sheet, row, 2, Some(week.cumulative_cost), &formats.currency, formats)?;
            write_value(sheet, row, 3, week.projected_income, &formats.currency, formats)?;
            write_value(sheet, row, 4, week.physical_progress_pct, &formats.percent, formats)?;
            write_value(sheet, row, 5, week.real_progress, &formats.currency, formats)?;
        }

        sheet
            .set_freeze_panes(1, 0)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        Ok(())
    }

    fn add_schedule_sheet(
        &self,
        workbook: &mut Workbook,
        report: &CostReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Cronograma")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let headers = [
            "Codigo",
            "Descripción",
            "Inicio",
            "Fin",
            "Duración (días)",
            "Costo ($)",
            "Costo por día",
        ];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 10).ok();
        sheet.set_column_width(1, 40).ok();
        sheet.set_column_width(2, 12).ok();
        sheet.set_column_width(3, 12).ok();
        sheet.set_column_width(4, 16).ok();
        sheet.set_column_width(5, 20).ok();
        sheet.set_column_width(6, 20).ok();

        for (i, task) in report.tasks.iter().enumerate() {
            let row = i as u32 + 1;
            write_text(sheet, row, 0, task.code.as_deref(), formats)?;
            write_text(sheet, row, 1, task.description.as_deref(), formats)?;
            write_date(sheet, row, 2, task.start, formats)?;
            write_date(sheet, row, 3, task.end, formats)?;
            write_value(sheet, row, 4, task.duration_days, &formats.number, formats)?;
            write_value(sheet, row, 5, task.cost, &formats.currency, formats)?;
            write_value(sheet, row, 6, task.cost_per_day(), &formats.currency, formats)?;
        }

        sheet
            .set_freeze_panes(1, 0)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &CostReport) -> Result<Vec<u8>, RenderError> {
        if report.weekly.is_empty() {
            return Err(RenderError::InvalidData("No weekly data to render".into()));
        }
        self.render_to_bytes(report)
    }
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *header, &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    Ok(())
}

fn write_blank(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    sheet
        .write_blank(row, col, &formats.blank)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn write_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            sheet
                .write_with_format(row, col, v, format)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            Ok(())
        }
        None => write_blank(sheet, row, col, formats),
    }
}

fn write_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    match value {
        Some(text) => {
            sheet
                .write_with_format(row, col, text, &formats.text)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            Ok(())
        }
        None => write_blank(sheet, row, col, formats),
    }
}

fn write_date(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<NaiveDate>,
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    let Some(date) = value else {
        return write_blank(sheet, row, col, formats);
    };
    match to_excel_date(date) {
        Ok(excel_date) => sheet.write_datetime_with_format(row, col, &excel_date, &formats.date),
        // Excel has no serial for dates before 1900; keep them as text
        Err(_) => sheet.write_with_format(row, col, date.to_string(), &formats.text),
    }
    .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn to_excel_date(date: NaiveDate) -> Result<ExcelDateTime, RenderError> {
    let year = u16::try_from(date.year())
        .ok()
        .filter(|y| (1900..=9999).contains(y))
        .ok_or_else(|| RenderError::InvalidData(format!("Date out of range: {date}")))?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)
        .map_err(|e| RenderError::InvalidData(format!("Date out of range: {date}: {e}")))
}
