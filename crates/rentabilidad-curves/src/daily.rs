//! Daily expansion and aggregation.
//!
//! Each task spreads its cost evenly over whole days starting at its start
//! date. Contributions of every task are then summed per calendar day.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rentabilidad_core::{DailyCost, ScheduleTask};
use tracing::{debug, warn};

/// One task's contribution on one day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub cost: f64,
}

/// Expand every eligible task into one entry per day offset in `[0, days)`.
///
/// A task is eligible when it has a start date, a finite duration and a
/// finite cost-per-day. Tasks longer than `max_task_days` are skipped.
pub fn expand(tasks: &[ScheduleTask], max_task_days: i64) -> Vec<DailyEntry> {
    let mut entries = Vec::new();
    for task in tasks {
        let (Some(start), Some(days), Some(rate)) =
            (task.start, task.expansion_days(), task.cost_per_day())
        else {
            continue;
        };
        if days > max_task_days {
            warn!(
                task = task.label(),
                days, max_task_days, "task duration exceeds limit, excluded from cost curve"
            );
            continue;
        }
        for offset in 0..days.max(0) as u64 {
            let Some(date) = start.checked_add_days(Days::new(offset)) else {
                break;
            };
            entries.push(DailyEntry { date, cost: rate });
        }
    }
    debug!(tasks = tasks.len(), entries = entries.len(), "daily expansion");
    entries
}

/// Sum entries by date and accumulate, ordered by date
pub fn aggregate(entries: &[DailyEntry]) -> Vec<DailyCost> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        *by_date.entry(entry.date).or_insert(0.0) += entry.cost;
    }

    let mut cumulative = 0.0;
    by_date
        .into_iter()
        .map(|(date, cost)| {
            cumulative += cost;
            DailyCost {
                date,
                cost,
                cumulative,
            }
        })
        .collect()
}
