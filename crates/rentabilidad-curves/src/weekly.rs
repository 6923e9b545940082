//! Weekly resampling and income projection.
//!
//! Buckets are calendar weeks closing on Sunday, labelled by that Sunday.
//! Every week between the first and the last bucket is present.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rentabilidad_core::{DailyCost, WeeklyPoint};
use tracing::debug;

/// Sunday on or after `date`
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let to_sunday = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(to_sunday)))
        .unwrap_or(date)
}

/// Sum daily costs into weekly buckets, then accumulate the weekly totals.
///
/// The cumulative column is rebuilt from the bucket totals rather than taken
/// from the daily running total.
pub fn resample(daily: &[DailyCost]) -> Vec<WeeklyPoint> {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut week = week_ending(first.date);
    let last_week = week_ending(last.date);
    while week <= last_week {
        buckets.insert(week, 0.0);
        match week.checked_add_days(Days::new(7)) {
            Some(next) => week = next,
            None => break,
        }
    }
    for day in daily {
        *buckets.entry(week_ending(day.date)).or_insert(0.0) += day.cost;
    }

    let mut cumulative = 0.0;
    let weekly: Vec<WeeklyPoint> = buckets
        .into_iter()
        .map(|(week_ending, periodic)| {
            cumulative += periodic;
            let mut point = WeeklyPoint::new(week_ending, periodic);
            point.cumulative_cost = cumulative;
            point
        })
        .collect();
    debug!(days = daily.len(), weeks = weekly.len(), "weekly resample");
    weekly
}

/// Fill `projected_income` with a straight line from 0 on the first bucket
/// to `total` on the last one.
///
/// With a single bucket the span is zero and the projection stays missing.
pub fn project_income(weekly: &mut [WeeklyPoint], total: f64) {
    let (Some(first), Some(last)) = (
        weekly.first().map(|w| w.week_ending),
        weekly.last().map(|w| w.week_ending),
    ) else {
        return;
    };
    let span = (last - first).num_days();
    for point in weekly.iter_mut() {
        point.projected_income = (span != 0).then(|| {
            let elapsed = (point.week_ending - first).num_days();
            total * elapsed as f64 / span as f64
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(date: NaiveDate, cost: f64, cumulative: f64) -> DailyCost {
        DailyCost {
            date,
            cost,
            cumulative,
        }
    }

    #[test]
    fn week_ends_on_sunday() {
        // 2024-03-04 is a Monday
        assert_eq!(week_ending(date(2024, 3, 4)), date(2024, 3, 10));
        assert_eq!(week_ending(date(2024, 3, 9)), date(2024, 3, 10));
        assert_eq!(week_ending(date(2024, 3, 10)), date(2024, 3, 10));
        assert_eq!(week_ending(date(2024, 3, 11)), date(2024, 3, 17));
    }

    #[test]
    fn resample_sums_into_buckets_and_fills_gaps() {
        let daily = vec![
            day(date(2024, 3, 4), 10.0, 10.0),
            day(date(2024, 3, 10), 5.0, 15.0),
            day(date(2024, 3, 25), 7.0, 22.0),
        ];

        let weekly = resample(&daily);

        let rows: Vec<(NaiveDate, f64, f64)> = weekly
            .iter()
            .map(|w| (w.week_ending, w.periodic_cost, w.cumulative_cost))
            .collect();
        assert_eq!(
            rows,
            vec![
                (date(2024, 3, 10), 15.0, 15.0),
                (date(2024, 3, 17), 0.0, 15.0),
                (date(2024, 3, 24), 0.0, 15.0),
                (date(2024, 3, 31), 7.0, 22.0),
            ]
        );
    }

    #[test]
    fn resample_of_nothing_is_empty() {
        assert!(resample(&[]).is_empty());
    }

    #[test]
    fn income_is_linear_between_first_and_last_week() {
        let daily = vec![
            day(date(2024, 3, 4), 1.0, 1.0),
            day(date(2024, 3, 25), 1.0, 2.0),
        ];
        let mut weekly = resample(&daily);
        project_income(&mut weekly, 900.0);

        let income: Vec<Option<f64>> = weekly.iter().map(|w| w.projected_income).collect();
        assert_eq!(income, vec![Some(0.0), Some(300.0), Some(600.0), Some(900.0)]);
    }

    #[test]
    fn single_week_has_no_income_projection() {
        let mut weekly = resample(&[day(date(2024, 3, 4), 1.0, 1.0)]);
        project_income(&mut weekly, 900.0);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].projected_income, None);
    }
}
