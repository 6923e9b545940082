//! Plain text summary for console output

use std::fmt::Write;

use chrono::NaiveDate;
use rentabilidad_core::{CostReport, RenderError, Renderer, ScheduleTask};

use crate::format_plain;

const DESCRIPTION_WIDTH: usize = 30;

/// Console summary: total cost, a task preview and the weekly table
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Heading printed above everything else
    pub title: String,
    /// Currency label after money amounts
    pub currency: String,
    /// How many schedule rows to preview
    pub preview_rows: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            title: "Costo vs Ingreso vs Avance Físico Real".into(),
            currency: "COP".into(),
            preview_rows: 5,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Number of schedule rows shown in the preview
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let mut out = String::new();
        let rule = "=".repeat(self.title.chars().count());
        writeln!(out, "{}\n{rule}", self.title).map_err(fmt_error)?;
        writeln!(
            out,
            "Costo total: {} {}",
            format_plain(report.total_cost, 2),
            self.currency
        )
        .map_err(fmt_error)?;
        if let (Some(first), Some(last)) = (report.first_week(), report.last_week()) {
            writeln!(out, "Semanas: {} ({first} a {last})", report.weekly.len())
                .map_err(fmt_error)?;
        }

        if self.preview_rows > 0 {
            out.push('\n');
            out.push_str(&preview_tasks(&report.tasks, self.preview_rows));
        }

        out.push('\n');
        out.push_str(&weekly_table(report)?);
        Ok(out)
    }
}

/// First `rows` schedule tasks as an aligned table
pub fn preview_tasks(tasks: &[ScheduleTask], rows: usize) -> String {
    let header = [
        "Codigo",
        "Descripción",
        "Inicio",
        "Fin",
        "Duración (días)",
        "Costo ($)",
        "Costo por día",
    ];
    let body: Vec<[String; 7]> = tasks
        .iter()
        .take(rows)
        .map(|t| {
            [
                t.code.clone().unwrap_or_else(|| "-".into()),
                t.description
                    .as_deref()
                    .map(|d| truncate(d, DESCRIPTION_WIDTH))
                    .unwrap_or_else(|| "-".into()),
                date_cell(t.start),
                date_cell(t.end),
                number_cell(t.duration_days, 1),
                number_cell(t.cost, 2),
                number_cell(t.cost_per_day(), 2),
            ]
        })
        .collect();

    let mut out = layout(&header, &body, &[false, false, false, false, true, true, true]);
    if tasks.len() > rows {
        let _ = writeln!(out, "... {} filas más", tasks.len() - rows);
    }
    out
}

fn weekly_table(report: &CostReport) -> Result<String, RenderError> {
    if report.weekly.is_empty() {
        return Err(RenderError::InvalidData("No weekly data to render".into()));
    }
    let header = [
        "Fecha",
        "Costo Semanal",
        "Costo Acumulado",
        "Ingreso Acumulado",
        "Avance Físico (%)",
        "Avance Real ($)",
    ];
    let body: Vec<[String; 6]> = report
        .weekly
        .iter()
        .map(|w| {
            [
                w.week_ending.to_string(),
                format_plain(w.periodic_cost, 2),
                format_plain(w.cumulative_cost, 2),
                number_cell(w.projected_income, 2),
                number_cell(w.physical_progress_pct, 1),
                number_cell(w.real_progress, 2),
            ]
        })
        .collect();
    Ok(layout(&header, &body, &[false, true, true, true, true, true]))
}

/// Pad every column to its widest cell; numeric columns align right
fn layout<const N: usize>(header: &[&str; N], body: &[[String; N]], right: &[bool; N]) -> String {
    let mut widths = header.map(|h| h.chars().count());
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths, right);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &separator, &widths, &[false; N]);
    for row in body {
        push_row(&mut out, row, &widths, right);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize], right: &[bool]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(right)
        .map(|((cell, &width), &right)| {
            // `{:>w$}` pads by chars, so accented headers line up
            if right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn number_cell(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format_plain(v, decimals))
        .unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn fmt_error(e: std::fmt::Error) -> RenderError {
    RenderError::Format(e.to_string())
}
