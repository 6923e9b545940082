//! # rentabilidad-render
//!
//! Rendering backends for cost reports.
//!
//! This crate provides:
//! - SVG line chart of cumulative cost vs projected income vs real progress
//! - Excel workbook with the weekly series and the loaded schedule
//! - Text summary for the terminal
//! - JSON dump of the full report
//!
//! ## Example
//!
//! ```rust,ignore
//! use rentabilidad_core::Renderer;
//! use rentabilidad_render::{ExcelRenderer, SvgChartRenderer, TextRenderer};
//!
//! let svg = SvgChartRenderer::new().currency("COP").render(&report)?;
//! let xlsx_bytes = ExcelRenderer::new().render(&report)?;
//! std::fs::write("curva.xlsx", xlsx_bytes)?;
//! print!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod chart;
pub mod excel;
pub mod text;

pub use chart::SvgChartRenderer;
pub use excel::ExcelRenderer;
pub use text::TextRenderer;

use rentabilidad_core::{CostReport, RenderError, Renderer};

/// Pretty-printed JSON of the whole report
#[derive(Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        serde_json::to_string_pretty(report).map_err(|e| RenderError::Format(e.to_string()))
    }
}

/// Format a number in plain notation with `,` thousands separators.
///
/// Never switches to scientific notation, however large the value.
pub fn format_plain(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
