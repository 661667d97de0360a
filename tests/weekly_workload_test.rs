// ABOUTME: Tests for the weekly workload time-series analysis
// ABOUTME: Monday-week sums, rolling bands, backfill, and the twelve-week cut

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use velometrics::engine::workload::weekly_workload;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_empty_input_yields_empty_series() {
    assert!(weekly_workload(&[], date(2023, 8, 14)).weeks.is_empty());
}

#[test]
fn test_weeks_start_on_monday_and_cap_at_twelve() {
    // Daily load of 10 every day for five weeks ending at a Wednesday anchor.
    let anchor = date(2023, 8, 16);
    assert_eq!(anchor.weekday(), Weekday::Wed);
    let daily: Vec<(NaiveDate, f64)> = (0..35)
        .map(|offset| (anchor - Duration::days(offset), 10.0))
        .collect();

    let series = weekly_workload(&daily, anchor);
    assert_eq!(series.weeks.len(), 12);
    assert!(series
        .weeks
        .iter()
        .all(|week| week.week_start_date.weekday() == Weekday::Mon));

    // The anchor's own week only has data through Wednesday.
    let last = series.weeks.last().unwrap();
    assert_eq!(last.week_start_date, date(2023, 8, 14));
    assert!((last.weekly_total - 30.0).abs() < 1e-9);

    // A fully covered week sums all seven days.
    let full = series
        .weeks
        .iter()
        .find(|week| week.week_start_date == date(2023, 8, 7))
        .unwrap();
    assert!((full.weekly_total - 70.0).abs() < 1e-9);
}

#[test]
fn test_missing_days_count_as_zero() {
    let anchor = date(2023, 8, 16);
    let daily = vec![(date(2023, 8, 14), 50.0)];
    let series = weekly_workload(&daily, anchor);

    let last = series.weeks.last().unwrap();
    assert!((last.weekly_total - 50.0).abs() < 1e-9);
    assert!(series
        .weeks
        .iter()
        .rev()
        .skip(1)
        .all(|week| week.weekly_total.abs() < 1e-9));
}

#[test]
fn test_rolling_band_is_non_negative_and_centered() {
    let anchor = date(2023, 8, 16);
    // Alternate heavy and empty weeks to force a wide deviation band.
    let daily: Vec<(NaiveDate, f64)> = (0..12)
        .filter(|week| week % 2 == 0)
        .map(|week| (date(2023, 8, 14) - Duration::weeks(week), 100.0))
        .collect();

    let series = weekly_workload(&daily, anchor);
    for week in &series.weeks {
        assert!(week.rolling_std_lower >= 0.0);
        assert!(week.rolling_std_upper >= week.rolling_avg);
        assert!(week.rolling_avg >= week.rolling_std_lower);
    }
}

#[test]
fn test_rolling_average_matches_last_four_weeks() {
    let anchor = date(2023, 8, 16);
    // One 70-load week followed by three empty weeks before the anchor week.
    let daily: Vec<(NaiveDate, f64)> = (0..7)
        .map(|offset| (date(2023, 7, 17) + Duration::days(offset), 10.0))
        .collect();

    let series = weekly_workload(&daily, anchor);
    let loaded = series
        .weeks
        .iter()
        .find(|week| week.week_start_date == date(2023, 7, 17))
        .unwrap();
    assert!((loaded.weekly_total - 70.0).abs() < 1e-9);

    // The window covering that single loaded week averages 70 / 4.
    let trailing = series
        .weeks
        .iter()
        .find(|week| week.week_start_date == date(2023, 8, 7))
        .unwrap();
    assert!((trailing.rolling_avg - 17.5).abs() < 1e-9);
}
