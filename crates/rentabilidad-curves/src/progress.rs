//! Physical-progress merge.
//!
//! A left join of the weekly series against the progress report on exact
//! date equality. Weeks without a report keep a missing value; nothing is
//! interpolated.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use rentabilidad_core::{ProgressEntry, WeeklyPoint};
use tracing::{debug, warn};

/// Attach reported percentages and their money equivalent to `weekly`.
///
/// Only entries recorded exactly at midnight can match a bucket. When a
/// date is reported more than once the first entry wins, so every week
/// keeps exactly one row; a plain left join would repeat the week instead.
pub fn merge(weekly: &mut [WeeklyPoint], entries: &[ProgressEntry], total: f64) {
    let mut by_date: HashMap<NaiveDate, Option<f64>> = HashMap::new();
    let mut off_midnight = 0usize;
    for entry in entries {
        if entry.recorded_at.time() != NaiveTime::MIN {
            off_midnight += 1;
            continue;
        }
        let date = entry.recorded_at.date();
        if by_date.contains_key(&date) {
            warn!(%date, "duplicate progress date, keeping the first entry");
            continue;
        }
        by_date.insert(date, entry.percent);
    }

    let mut matched = 0usize;
    for point in weekly.iter_mut() {
        let percent = by_date.get(&point.week_ending).copied().flatten();
        if percent.is_some() {
            matched += 1;
        }
        point.physical_progress_pct = percent;
        point.real_progress = percent.map(|p| p * total / 100.0);
    }
    debug!(
        entries = entries.len(),
        matched, off_midnight, "progress merged into weekly series"
    );
}
