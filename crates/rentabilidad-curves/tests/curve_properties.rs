//! Integration tests for the cost-curve pipeline
//!
//! These tests exercise `CurveBuilder::build` end to end: expansion,
//! aggregation, weekly resampling, income projection and progress merge.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rentabilidad_core::{ProgressEntry, ScheduleTask};
use rentabilidad_curves::{daily, CurveBuilder, CurveError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(code: &str, start: NaiveDate, days: f64, cost: f64) -> ScheduleTask {
    ScheduleTask::new(code).start(start).duration_days(days).cost(cost)
}

/// Three 300-cost, 3-day tasks starting Friday, Saturday and Sunday
fn staggered_tasks() -> Vec<ScheduleTask> {
    vec![
        task("1", date(2024, 3, 8), 3.0, 300.0),
        task("2", date(2024, 3, 9), 3.0, 300.0),
        task("3", date(2024, 3, 10), 3.0, 300.0),
    ]
}

#[test]
fn each_task_expands_to_duration_entries_summing_to_cost() {
    for (days, cost) in [(1.0, 50.0), (3.0, 300.0), (10.0, 1_234.5), (31.0, 1e9)] {
        let entries = daily::expand(&[task("t", date(2024, 1, 1), days, cost)], 36_500);
        assert_eq!(entries.len(), days as usize);
        let per_day = cost / days;
        assert!(entries.iter().all(|e| e.cost == per_day));
        let sum: f64 = entries.iter().map(|e| e.cost).sum();
        assert!((sum - cost).abs() < 1e-6 * cost.max(1.0));
    }
}

#[test]
fn overlapping_tasks_sum_on_shared_dates() {
    let report = CurveBuilder::new().build(&staggered_tasks(), None).unwrap();

    let daily: Vec<(NaiveDate, f64)> = report.daily.iter().map(|d| (d.date, d.cost)).collect();
    assert_eq!(
        daily,
        vec![
            (date(2024, 3, 8), 100.0),
            (date(2024, 3, 9), 200.0),
            (date(2024, 3, 10), 300.0),
            (date(2024, 3, 11), 200.0),
            (date(2024, 3, 12), 100.0),
        ]
    );
    assert_eq!(report.daily.last().unwrap().cumulative, 900.0);

    let weekly: Vec<(NaiveDate, f64, f64)> = report
        .weekly
        .iter()
        .map(|w| (w.week_ending, w.periodic_cost, w.cumulative_cost))
        .collect();
    assert_eq!(
        weekly,
        vec![(date(2024, 3, 10), 600.0, 600.0), (date(2024, 3, 17), 300.0, 900.0)]
    );
}

#[test]
fn weekly_cumulative_cost_never_decreases() {
    let tasks = vec![
        task("a", date(2024, 1, 3), 20.0, 2_000.0),
        task("b", date(2024, 2, 20), 5.0, 750.0),
        task("c", date(2024, 4, 1), 45.0, 9_000.0),
        task("d", date(2024, 1, 15), 0.0, 500.0),
    ];

    let report = CurveBuilder::new().build(&tasks, None).unwrap();

    assert!(report.weekly.len() > 10);
    for pair in report.weekly.windows(2) {
        assert!(pair[1].cumulative_cost >= pair[0].cumulative_cost);
        assert_eq!((pair[1].week_ending - pair[0].week_ending).num_days(), 7);
    }
}

#[test]
fn projected_income_runs_from_zero_to_total_cost() {
    let tasks = vec![
        task("a", date(2024, 1, 1), 10.0, 1_000.0),
        task("b", date(2024, 3, 1), 10.0, 3_000.0),
        // Counts toward the total even though it is never expanded
        ScheduleTask::new("c").cost(2_000.0),
    ];

    let report = CurveBuilder::new().build(&tasks, None).unwrap();
    assert_eq!(report.total_cost, 6_000.0);

    let first = report.weekly.first().unwrap();
    let last = report.weekly.last().unwrap();
    assert_eq!(first.projected_income, Some(0.0));
    assert!((last.projected_income.unwrap() - 6_000.0).abs() < 1e-9);

    let span = (last.week_ending - first.week_ending).num_days() as f64;
    for point in &report.weekly {
        let elapsed = (point.week_ending - first.week_ending).num_days() as f64;
        let expected = 6_000.0 * elapsed / span;
        assert!((point.projected_income.unwrap() - expected).abs() < 1e-6);
    }
}

#[test]
fn progress_without_overlap_is_all_missing() {
    let progress = vec![
        ProgressEntry::on(date(2023, 12, 31), 5.0),
        ProgressEntry::on(date(2024, 3, 13), 50.0),
    ];

    let report = CurveBuilder::new()
        .build(&staggered_tasks(), Some(&progress))
        .unwrap();

    assert!(report.has_progress);
    assert!(report.weekly.iter().all(|w| w.real_progress.is_none()));
}

#[test]
fn progress_on_week_dates_becomes_money() {
    let progress = vec![
        ProgressEntry::on(date(2024, 3, 10), 40.0),
        ProgressEntry::on(date(2024, 3, 17), 100.0),
    ];

    let report = CurveBuilder::new()
        .build(&staggered_tasks(), Some(&progress))
        .unwrap();

    let money: Vec<Option<f64>> = report.weekly.iter().map(|w| w.real_progress).collect();
    assert_eq!(money, vec![Some(360.0), Some(900.0)]);
}

#[test]
fn zero_duration_task_is_excluded_without_error() {
    let mut tasks = staggered_tasks();
    tasks.push(task("milestone", date(2024, 3, 9), 0.0, 1_000.0));

    let report = CurveBuilder::new().build(&tasks, None).unwrap();

    assert_eq!(report.daily.last().unwrap().cumulative, 900.0);
    assert_eq!(report.total_cost, 1_900.0);
    assert_eq!(report.tasks.len(), 4);
}

#[test]
fn nothing_to_expand_is_an_error() {
    let tasks = vec![
        task("zero", date(2024, 3, 9), 0.0, 1_000.0),
        ScheduleTask::new("blank"),
    ];

    let err = CurveBuilder::new().build(&tasks, None).unwrap_err();

    assert!(matches!(err, CurveError::NoExpandableTasks { tasks: 2 }));
}
