//! SVG comparison chart
//!
//! One figure, weekly date axis, up to three series:
//! - cumulative cost: solid line with circle markers
//! - projected income: dashed line
//! - real progress: dash-dot line with square markers
//!
//! Missing values break a line into separate segments rather than being
//! bridged.

use chrono::NaiveDate;
use svg::node::element::{Circle, Group, Line, Polyline, Rectangle, Text};
use svg::Document;

use rentabilidad_core::{CostReport, RenderError, Renderer, Series, WeeklyPoint};

use crate::format_plain;

/// Number of horizontal grid intervals aimed for on the value axis
const TARGET_Y_TICKS: f64 = 8.0;

/// SVG chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgChartRenderer {
    /// Total width in pixels
    pub width: u32,
    /// Total height in pixels
    pub height: u32,
    /// Space left of the plot area for value labels
    pub margin_left: u32,
    /// Space right of the plot area
    pub margin_right: u32,
    /// Space above the plot area for the title
    pub margin_top: u32,
    /// Space below the plot area for date labels
    pub margin_bottom: u32,
    /// Chart title
    pub title: String,
    /// Currency label for the value axis and legend
    pub currency: String,
    /// Color for the cumulative cost series
    pub cost_color: String,
    /// Color for the projected income series
    pub income_color: String,
    /// Color for the real progress series
    pub progress_color: String,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Marker radius in pixels
    pub marker_size: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 700,
            margin_left: 130,
            margin_right: 40,
            margin_top: 70,
            margin_bottom: 110,
            title: "Costo vs Ingreso vs Avance Físico Real".into(),
            currency: "COP".into(),
            cost_color: "#1f77b4".into(),
            income_color: "#ff7f0e".into(),
            progress_color: "#2ca02c".into(),
            background_color: "#ffffff".into(),
            grid_color: "#b0b0b0".into(),
            text_color: "#262626".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 13,
            marker_size: 4.0,
        }
    }
}

/// Line style of one series
struct SeriesStyle<'a> {
    color: &'a str,
    dash: Option<&'static str>,
    marker: Marker,
}

#[derive(Clone, Copy, PartialEq)]
enum Marker {
    None,
    Circle,
    Square,
}

/// Pixel mapping for the plot area
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    first: NaiveDate,
    span_days: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn x(&self, date: NaiveDate) -> f64 {
        if self.span_days == 0.0 {
            return self.left + self.width / 2.0;
        }
        let days = (date - self.first).num_days() as f64;
        self.left + days / self.span_days * self.width
    }

    fn y(&self, value: f64) -> f64 {
        self.top + self.height - (value - self.y_min) / (self.y_max - self.y_min) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

impl SvgChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure overall size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Configure the chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Configure the currency label
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn style(&self, series: Series) -> SeriesStyle<'_> {
        match series {
            Series::CumulativeCost => SeriesStyle {
                color: &self.cost_color,
                dash: None,
                marker: Marker::Circle,
            },
            Series::ProjectedIncome => SeriesStyle {
                color: &self.income_color,
                dash: Some("9,5"),
                marker: Marker::None,
            },
            Series::RealProgress => SeriesStyle {
                color: &self.progress_color,
                dash: Some("9,4,2,4"),
                marker: Marker::Square,
            },
        }
    }

    fn frame(&self, report: &CostReport) -> Result<Frame, RenderError> {
        let (Some(first), Some(last)) = (report.first_week(), report.last_week()) else {
            return Err(RenderError::InvalidData("No weekly data to plot".into()));
        };
        let width = self.width.saturating_sub(self.margin_left + self.margin_right);
        let height = self.height.saturating_sub(self.margin_top + self.margin_bottom);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidData(format!(
                "Chart size {}x{} leaves no room for the plot area",
                self.width, self.height
            )));
        }
        let (y_min, y_max, _) = value_axis(report.min_value(), report.max_value());
        Ok(Frame {
            left: self.margin_left as f64,
            top: self.margin_top as f64,
            width: width as f64,
            height: height as f64,
            first,
            span_days: (last - first).num_days() as f64,
            y_min,
            y_max,
        })
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size: u32) -> Text {
        Text::new(content.into())
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", size)
            .set("fill", self.text_color.as_str())
    }

    /// Dashed grid plus value axis labels
    fn render_value_axis(&self, frame: &Frame, report: &CostReport) -> Group {
        let mut group = Group::new().set("class", "y-axis");
        let (y_min, y_max, step) = value_axis(report.min_value(), report.max_value());
        let decimals = decimals_for(step);

        let ticks = ((y_max - y_min) / step).round() as u32;
        for i in 0..=ticks {
            let value = y_min + f64::from(i) * step;
            let y = frame.y(value);
            group = group.add(
                Line::new()
                    .set("x1", frame.left)
                    .set("y1", y)
                    .set("x2", frame.right())
                    .set("y2", y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 0.8)
                    .set("stroke-dasharray", "4,4")
                    .set("stroke-opacity", 0.6),
            );
            group = group.add(
                self.text(format_plain(value, decimals), frame.left - 8.0, y + 4.0, self.font_size - 1)
                    .set("text-anchor", "end"),
            );
        }

        let label_x = 24.0;
        let label_y = frame.top + frame.height / 2.0;
        group.add(
            self.text(self.currency.as_str(), label_x, label_y, self.font_size)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 {label_x} {label_y})")),
        )
    }

    /// Dashed grid plus date labels
    fn render_date_axis(&self, frame: &Frame, report: &CostReport) -> Group {
        let mut group = Group::new().set("class", "x-axis");
        let every = tick_interval(report.weekly.len());

        for point in report.weekly.iter().step_by(every) {
            let x = frame.x(point.week_ending);
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", frame.top)
                    .set("x2", x)
                    .set("y2", frame.bottom())
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 0.8)
                    .set("stroke-dasharray", "4,4")
                    .set("stroke-opacity", 0.6),
            );
            let y = frame.bottom() + 18.0;
            group = group.add(
                self.text(point.week_ending.format("%Y-%m-%d").to_string(), x, y, self.font_size - 2)
                    .set("text-anchor", "end")
                    .set("transform", format!("rotate(-35 {x} {y})")),
            );
        }

        group.add(
            self.text("Fecha", frame.left + frame.width / 2.0, self.height as f64 - 14.0, self.font_size)
                .set("text-anchor", "middle"),
        )
    }

    fn render_series(&self, frame: &Frame, weekly: &[WeeklyPoint], series: Series) -> Group {
        let style = self.style(series);
        let mut group = Group::new().set("class", "series");

        for segment in segments(weekly, series) {
            if segment.len() >= 2 {
                let points: Vec<String> = segment
                    .iter()
                    .map(|(date, value)| format!("{:.2},{:.2}", frame.x(*date), frame.y(*value)))
                    .collect();
                let mut line = Polyline::new()
                    .set("points", points.join(" "))
                    .set("fill", "none")
                    .set("stroke", style.color)
                    .set("stroke-width", 2)
                    .set("stroke-linejoin", "round");
                if let Some(dash) = style.dash {
                    line = line.set("stroke-dasharray", dash);
                }
                group = group.add(line);
            }
            for (date, value) in &segment {
                if let Some(marker) = self.marker(style.marker, style.color, frame.x(*date), frame.y(*value)) {
                    group = group.add(marker);
                }
            }
        }
        group
    }

    fn marker(&self, kind: Marker, color: &str, x: f64, y: f64) -> Option<Group> {
        let r = self.marker_size;
        match kind {
            Marker::None => None,
            Marker::Circle => Some(Group::new().add(
                Circle::new()
                    .set("cx", x)
                    .set("cy", y)
                    .set("r", r)
                    .set("fill", color),
            )),
            Marker::Square => Some(Group::new().add(
                Rectangle::new()
                    .set("x", x - r)
                    .set("y", y - r)
                    .set("width", r * 2.0)
                    .set("height", r * 2.0)
                    .set("fill", color),
            )),
        }
    }

    fn render_legend(&self, frame: &Frame, series: &[Series]) -> Group {
        let row_height = self.font_size as f64 + 10.0;
        let x = frame.left + 14.0;
        let y = frame.top + 12.0;
        let width = 260.0;
        let height = row_height * series.len() as f64 + 10.0;

        let mut group = Group::new().set("class", "legend").add(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", width)
                .set("height", height)
                .set("rx", 4)
                .set("fill", self.background_color.as_str())
                .set("fill-opacity", 0.85)
                .set("stroke", self.grid_color.as_str()),
        );

        for (i, s) in series.iter().enumerate() {
            let style = self.style(*s);
            let cy = y + 5.0 + row_height * (i as f64 + 0.5);
            let mut sample = Line::new()
                .set("x1", x + 10.0)
                .set("y1", cy)
                .set("x2", x + 44.0)
                .set("y2", cy)
                .set("stroke", style.color)
                .set("stroke-width", 2);
            if let Some(dash) = style.dash {
                sample = sample.set("stroke-dasharray", dash);
            }
            group = group.add(sample);
            if let Some(marker) = self.marker(style.marker, style.color, x + 27.0, cy) {
                group = group.add(marker);
            }
            group = group.add(self.text(s.label(&self.currency), x + 54.0, cy + 4.0, self.font_size - 1));
        }
        group
    }
}

impl Renderer for SvgChartRenderer {
    type Output = String;

    fn render(&self, report: &CostReport) -> Result<String, RenderError> {
        let frame = self.frame(report)?;
        let series = report.plotted_series();

        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0, 0, self.width, self.height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );

        document = document.add(
            self.text(self.title.as_str(), self.width as f64 / 2.0, self.margin_top as f64 / 2.0 + 8.0, self.font_size + 5)
                .set("text-anchor", "middle")
                .set("font-weight", "bold"),
        );

        document = document.add(self.render_value_axis(&frame, report));
        document = document.add(self.render_date_axis(&frame, report));

        // Plot area border
        document = document.add(
            Rectangle::new()
                .set("x", frame.left)
                .set("y", frame.top)
                .set("width", frame.width)
                .set("height", frame.height)
                .set("fill", "none")
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1),
        );

        for s in &series {
            document = document.add(self.render_series(&frame, &report.weekly, *s));
        }

        document = document.add(self.render_legend(&frame, &series));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Runs of consecutive present values of one series
fn segments(weekly: &[WeeklyPoint], series: Series) -> Vec<Vec<(NaiveDate, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in weekly {
        match point.value(series).filter(|v| v.is_finite()) {
            Some(value) => current.push((point.week_ending, value)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Axis bounds and tick step: `(bottom, top, step)`.
///
/// The range always includes zero and both ends land on a multiple of the step.
fn value_axis(min: f64, max: f64) -> (f64, f64, f64) {
    let (min, max) = (min.min(0.0), max.max(0.0));
    if !(min.is_finite() && max.is_finite()) || max - min <= 0.0 {
        return (0.0, 1.0, 0.2);
    }
    let step = nice_step((max - min) / TARGET_Y_TICKS);
    ((min / step).floor() * step, (max / step).ceil() * step, step)
}

/// Round `raw` up to 1, 2, 2.5, 5 or 10 times a power of ten
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Fewest decimals that print every multiple of `step` exactly
fn decimals_for(step: f64) -> usize {
    (0..10)
        .find(|d| {
            let scaled = step * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(10)
}

/// Label every n-th week so roughly a dozen dates fit on the axis
fn tick_interval(weeks: usize) -> usize {
    match weeks {
        0..=14 => 1,
        15..=28 => 2,
        29..=56 => 4,
        57..=112 => 8,
        _ => weeks / 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(week: NaiveDate, cumulative: f64, income: Option<f64>, real: Option<f64>) -> WeeklyPoint {
        let mut p = WeeklyPoint::new(week, 0.0);
        p.cumulative_cost = cumulative;
        p.projected_income = income;
        p.real_progress = real;
        p
    }

    fn report(has_progress: bool) -> CostReport {
        CostReport {
            tasks: vec![],
            daily: vec![],
            weekly: vec![
                point(date(2024, 3, 10), 600.0, Some(0.0), Some(100.0)),
                point(date(2024, 3, 17), 900.0, Some(450.0), None),
                point(date(2024, 3, 24), 1_200.0, Some(900.0), Some(800.0)),
            ],
            total_cost: 900.0,
            has_progress,
        }
    }

    #[test]
    fn renderer_defaults() {
        let renderer = SvgChartRenderer::new();
        assert_eq!((renderer.width, renderer.height), (1400, 700));
        assert_eq!(renderer.currency, "COP");
    }

    #[test]
    fn renderer_builders() {
        let renderer = SvgChartRenderer::new().size(800, 400).title("Obra").currency("USD");
        assert_eq!((renderer.width, renderer.height), (800, 400));
        assert_eq!(renderer.title, "Obra");
        assert_eq!(renderer.currency, "USD");
    }

    #[test]
    fn segments_split_on_missing_values() {
        let runs = segments(&report(true).weekly, Series::RealProgress);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(date(2024, 3, 10), 100.0)]);
        assert_eq!(runs[1], vec![(date(2024, 3, 24), 800.0)]);

        let runs = segments(&report(true).weekly, Series::CumulativeCost);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn value_axis_rounds_up_to_nice_step() {
        assert_eq!(value_axis(0.0, 1_200.0), (0.0, 1_200.0, 200.0));
        assert_eq!(value_axis(0.0, 950.0), (0.0, 1_000.0, 200.0));
        let (bottom, top, step) = value_axis(0.0, 1_850_000_000.0);
        assert_eq!(bottom, 0.0);
        assert_eq!(step, 250_000_000.0);
        assert_eq!(top, 2_000_000_000.0);
        assert_eq!(value_axis(0.0, 0.0), (0.0, 1.0, 0.2));
    }

    #[test]
    fn value_axis_extends_below_zero() {
        assert_eq!(value_axis(-300.0, 900.0), (-400.0, 1_000.0, 200.0));
        assert_eq!(value_axis(-950.0, 0.0), (-1_000.0, 0.0, 200.0));
        // positive minimums still start at zero
        assert_eq!(value_axis(500.0, 1_200.0), (0.0, 1_200.0, 200.0));
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(decimals_for(200.0), 0);
        assert_eq!(decimals_for(0.2), 1);
        assert_eq!(decimals_for(0.05), 2);
        assert_eq!(decimals_for(0.25), 2);
    }

    #[test]
    fn tick_interval_thins_long_projects() {
        assert_eq!(tick_interval(10), 1);
        assert_eq!(tick_interval(20), 2);
        assert_eq!(tick_interval(52), 4);
        assert_eq!(tick_interval(100), 8);
        assert_eq!(tick_interval(240), 20);
    }

    #[test]
    fn frame_maps_dates_and_values() {
        let renderer = SvgChartRenderer::new();
        let frame = renderer.frame(&report(false)).unwrap();
        assert_eq!(frame.x(date(2024, 3, 10)), frame.left);
        assert_eq!(frame.x(date(2024, 3, 24)), frame.right());
        assert_eq!(frame.y(0.0), frame.bottom());
        assert_eq!(frame.y(frame.y_max), frame.top);
    }

    #[test]
    fn negative_values_stay_inside_plot_area() {
        let mut dip = report(false);
        dip.weekly[0].cumulative_cost = -300.0;
        let frame = SvgChartRenderer::new().frame(&dip).unwrap();

        assert!(frame.y_min < 0.0);
        assert_eq!(frame.y(frame.y_min), frame.bottom());
        let y = frame.y(-300.0);
        assert!(y <= frame.bottom() && y >= frame.top);
        assert!(frame.y(0.0) < frame.bottom());
    }

    #[test]
    fn single_week_is_centered() {
        let mut single = report(false);
        single.weekly.truncate(1);
        let renderer = SvgChartRenderer::new();
        let frame = renderer.frame(&single).unwrap();
        assert_eq!(frame.x(date(2024, 3, 10)), frame.left + frame.width / 2.0);
    }

    #[test]
    fn empty_report_fails() {
        let mut empty = report(false);
        empty.weekly.clear();
        assert!(SvgChartRenderer::new().render(&empty).is_err());
    }

    #[test]
    fn tiny_canvas_fails() {
        let renderer = SvgChartRenderer::new().size(100, 100);
        assert!(renderer.render(&report(false)).is_err());
    }
}
