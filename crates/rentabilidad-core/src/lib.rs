//! # rentabilidad-core
//!
//! Core domain model and traits for construction cost-curve reports.
//!
//! This crate provides:
//! - Domain types: `ScheduleTask`, `DailyCost`, `WeeklyPoint`, `ProgressEntry`, `CostReport`
//! - Core trait: `Renderer`
//! - Series labels shared by every output format
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rentabilidad_core::ScheduleTask;
//!
//! let task = ScheduleTask::new("1.1")
//!     .description("Excavación")
//!     .start(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
//!     .duration_days(4.0)
//!     .cost(1_000.0);
//! assert_eq!(task.cost_per_day(), Some(250.0));
//! assert_eq!(task.expansion_days(), Some(4));
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Schedule
// ============================================================================

/// One row of the project schedule sheet.
///
/// Every field is optional: cells that fail coercion are kept as missing
/// instead of rejecting the whole row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTask {
    /// Activity code (`Codigo`)
    pub code: Option<String>,
    /// Activity description (`Descripción`)
    pub description: Option<String>,
    /// Planned start (`Inicio`)
    pub start: Option<NaiveDate>,
    /// Planned finish (`Fin`)
    pub end: Option<NaiveDate>,
    /// Duration in calendar days (`Duración (días)`)
    pub duration_days: Option<f64>,
    /// Total cost of the activity (`Costo ($)`)
    pub cost: Option<f64>,
}

impl ScheduleTask {
    /// Create a task with the given code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the planned start
    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the planned finish
    pub fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the duration in days
    pub fn duration_days(mut self, days: f64) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Set the total cost
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Daily cost rate: total cost divided by duration.
    ///
    /// Returns `None` when either input is missing or the quotient is not
    /// finite (zero duration, NaN inputs).
    pub fn cost_per_day(&self) -> Option<f64> {
        let rate = self.cost? / self.duration_days?;
        rate.is_finite().then_some(rate)
    }

    /// Number of whole days the task spreads its cost over.
    ///
    /// The duration is truncated toward zero; `None` when the duration is
    /// missing or not finite. Non-positive durations yield `Some(0)` or less,
    /// which expand to nothing.
    pub fn expansion_days(&self) -> Option<i64> {
        self.duration_days
            .filter(|d| d.is_finite())
            .map(|d| d.trunc() as i64)
    }

    /// Label used in previews: code, falling back to description
    pub fn label(&self) -> &str {
        self.code
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

/// Sum of every known task cost. Missing costs are skipped.
pub fn total_cost(tasks: &[ScheduleTask]) -> f64 {
    tasks
        .iter()
        .filter_map(|t| t.cost)
        .filter(|c| !c.is_nan())
        .sum()
}

// ============================================================================
// Cost Series
// ============================================================================

/// Aggregated cost for one calendar day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: NaiveDate,
    /// Sum of every task's contribution on this date
    pub cost: f64,
    /// Running total up to and including this date
    pub cumulative: f64,
}

/// One bucket of the weekly comparison series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    /// Sunday closing the bucket
    pub week_ending: NaiveDate,
    /// Cost incurred inside the bucket
    pub periodic_cost: f64,
    /// Running total of `periodic_cost`
    pub cumulative_cost: f64,
    /// Linear income projection; missing when the series spans a single week
    pub projected_income: Option<f64>,
    /// Reported physical progress (0-100) for this exact date
    pub physical_progress_pct: Option<f64>,
    /// `physical_progress_pct` expressed in money
    pub real_progress: Option<f64>,
}

impl WeeklyPoint {
    pub fn new(week_ending: NaiveDate, periodic_cost: f64) -> Self {
        Self {
            week_ending,
            periodic_cost,
            cumulative_cost: 0.0,
            projected_income: None,
            physical_progress_pct: None,
            real_progress: None,
        }
    }

    /// Value of one plotted series at this point
    pub fn value(&self, series: Series) -> Option<f64> {
        match series {
            Series::CumulativeCost => Some(self.cumulative_cost),
            Series::ProjectedIncome => self.projected_income,
            Series::RealProgress => self.real_progress,
        }
    }
}

/// One row of an external physical-progress report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub recorded_at: NaiveDateTime,
    /// Physical progress percentage; missing when the cell was not numeric
    pub percent: Option<f64>,
}

impl ProgressEntry {
    /// Entry recorded at midnight of `date`
    pub fn on(date: NaiveDate, percent: f64) -> Self {
        Self {
            recorded_at: date.and_time(chrono::NaiveTime::MIN),
            percent: Some(percent),
        }
    }
}

/// The plotted series, in legend order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    CumulativeCost,
    ProjectedIncome,
    RealProgress,
}

impl Series {
    pub const ALL: [Series; 3] = [
        Series::CumulativeCost,
        Series::ProjectedIncome,
        Series::RealProgress,
    ];

    /// Legend label, with the currency label in parentheses where relevant
    pub fn label(self, currency: &str) -> String {
        match self {
            Series::CumulativeCost => format!("Costo Acumulado ({currency})"),
            Series::ProjectedIncome => format!("Ingreso Proyectado ({currency})"),
            Series::RealProgress => "Avance Físico Real ($)".to_string(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Everything one pass of the pipeline produces
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Tasks as loaded from the schedule sheet
    pub tasks: Vec<ScheduleTask>,
    /// Daily aggregated costs, strictly ordered by date
    pub daily: Vec<DailyCost>,
    /// Weekly buckets, strictly ordered by week
    pub weekly: Vec<WeeklyPoint>,
    /// Sum of every task cost, used as the total contract income
    pub total_cost: f64,
    /// Whether a physical-progress report was merged
    pub has_progress: bool,
}

impl CostReport {
    /// First week bucket
    pub fn first_week(&self) -> Option<NaiveDate> {
        self.weekly.first().map(|w| w.week_ending)
    }

    /// Last week bucket
    pub fn last_week(&self) -> Option<NaiveDate> {
        self.weekly.last().map(|w| w.week_ending)
    }

    /// Series that carry data in this report
    pub fn plotted_series(&self) -> Vec<Series> {
        Series::ALL
            .into_iter()
            .filter(|s| *s != Series::RealProgress || self.has_progress)
            .collect()
    }

    /// Largest plotted value, for axis scaling
    pub fn max_value(&self) -> f64 {
        let series = self.plotted_series();
        self.weekly
            .iter()
            .flat_map(|w| series.iter().filter_map(move |s| w.value(*s)))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    /// Smallest plotted value, never above zero
    pub fn min_value(&self) -> f64 {
        let series = self.plotted_series();
        self.weekly
            .iter()
            .flat_map(|w| series.iter().filter_map(move |s| w.value(*s)))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::min)
    }
}

// ============================================================================
// Renderer Trait
// ============================================================================

/// Render a cost report to some output format
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &CostReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
