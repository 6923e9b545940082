//! # rentabilidad-curves
//!
//! Cost-curve pipeline for construction schedules.
//!
//! This crate provides:
//! - Daily expansion of task costs and per-day aggregation
//! - Weekly resampling with cumulative totals
//! - Linear projected-income curve across the project span
//! - Physical-progress merge by exact week date
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rentabilidad_core::ScheduleTask;
//! use rentabilidad_curves::CurveBuilder;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let tasks = vec![ScheduleTask::new("1").start(start).duration_days(14.0).cost(1_400.0)];
//!
//! let report = CurveBuilder::new().build(&tasks, None).unwrap();
//! assert_eq!(report.total_cost, 1_400.0);
//! assert_eq!(report.weekly.len(), 2);
//! ```

pub mod daily;
pub mod progress;
pub mod weekly;

use rentabilidad_core::{total_cost, CostReport, ProgressEntry, ScheduleTask};
use thiserror::Error;
use tracing::info;

/// Longest task, in days, that is expanded by default (100 years)
pub const DEFAULT_MAX_TASK_DAYS: i64 = 36_500;

/// Cost-curve computation error
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("No task has a valid start date, duration and cost per day ({tasks} rows read)")]
    NoExpandableTasks { tasks: usize },
}

/// Builds a `CostReport` from loaded tasks and an optional progress report
#[derive(Clone, Debug)]
pub struct CurveBuilder {
    /// Tasks with more whole days than this are left out of the curves
    pub max_task_days: i64,
}

impl CurveBuilder {
    pub fn new() -> Self {
        Self {
            max_task_days: DEFAULT_MAX_TASK_DAYS,
        }
    }

    /// Configure the task length ceiling
    pub fn max_task_days(mut self, days: i64) -> Self {
        self.max_task_days = days;
        self
    }

    /// Run the whole pipeline.
    ///
    /// Income and real progress are scaled by the sum of every task cost,
    /// including tasks that could not be expanded.
    pub fn build(
        &self,
        tasks: &[ScheduleTask],
        progress: Option<&[ProgressEntry]>,
    ) -> Result<CostReport, CurveError> {
        let entries = daily::expand(tasks, self.max_task_days);
        if entries.is_empty() {
            return Err(CurveError::NoExpandableTasks { tasks: tasks.len() });
        }
        let daily = daily::aggregate(&entries);

        let total = total_cost(tasks);
        let mut weekly = weekly::resample(&daily);
        weekly::project_income(&mut weekly, total);

        if let Some(entries) = progress {
            progress::merge(&mut weekly, entries, total);
        }

        info!(
            tasks = tasks.len(),
            days = daily.len(),
            weeks = weekly.len(),
            total_cost = total,
            "cost curves built"
        );
        Ok(CostReport {
            tasks: tasks.to_vec(),
            daily,
            weekly,
            total_cost: total,
            has_progress: progress.is_some(),
        })
    }
}

impl Default for CurveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        assert_eq!(CurveBuilder::new().max_task_days, DEFAULT_MAX_TASK_DAYS);
        assert_eq!(CurveBuilder::new().max_task_days(30).max_task_days, 30);
    }

    #[test]
    fn empty_schedule_is_an_error() {
        let err = CurveBuilder::new().build(&[], None).unwrap_err();
        assert!(matches!(err, CurveError::NoExpandableTasks { tasks: 0 }));
    }
}
