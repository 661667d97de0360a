// ABOUTME: Weekly workload time-series analysis with rolling mean and deviation bands
// ABOUTME: Monday-start weekly sums over a reindexed 16-week window, last 12 weeks served
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Weekly workload analysis.
//!
//! Turns daily load aggregates into the weekly series behind the workload
//! chart: per-week totals with a 4-week rolling average and a one-standard-
//! deviation band around it. Sixteen weeks are aggregated so the rolling
//! statistics are warm for all twelve weeks served.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Weeks of history aggregated before the rolling statistics are taken
const HISTORY_WEEKS: i64 = 16;

/// Weeks served to the caller
const OUTPUT_WEEKS: usize = 12;

/// Window of the rolling mean and standard deviation, in weeks
const ROLLING_WINDOW_WEEKS: usize = 4;

/// One week of workload with its rolling statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyWorkloadPoint {
    /// Monday the week starts on
    pub week_start_date: NaiveDate,
    /// Sum of the metric over the week
    pub weekly_total: f64,
    /// 4-week rolling average
    pub rolling_avg: f64,
    /// Rolling average plus one standard deviation
    pub rolling_std_upper: f64,
    /// Rolling average minus one standard deviation, floored at zero
    pub rolling_std_lower: f64,
}

/// Weekly workload series, oldest week first
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeeklyWorkload {
    /// At most twelve weeks ending with the week containing the anchor date
    pub weeks: Vec<WeeklyWorkloadPoint>,
}

/// Aggregate daily values into the weekly workload series
///
/// Days missing from the input count as zero; the range covered always spans
/// the sixteen weeks up to the end of the week containing `end_date`, so the
/// chart stays complete even for sparse training logs. Empty input yields an
/// empty series.
#[must_use]
pub fn weekly_workload(daily_aggregates: &[(NaiveDate, f64)], end_date: NaiveDate) -> WeeklyWorkload {
    if daily_aggregates.is_empty() {
        return WeeklyWorkload::default();
    }

    let by_date: HashMap<NaiveDate, f64> = daily_aggregates.iter().copied().collect();
    let history_start = end_date - Duration::weeks(HISTORY_WEEKS);
    let week_end = end_date + Duration::days(i64::from(6 - end_date.weekday().num_days_from_monday()));

    // Reindex onto the full range and fold each day into its Monday-start week.
    let mut week_starts = Vec::new();
    let mut totals = Vec::new();
    let mut day = history_start;
    while day <= week_end {
        let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
        if week_starts.last() != Some(&monday) {
            week_starts.push(monday);
            totals.push(0.0);
        }
        if let (Some(total), Some(value)) = (totals.last_mut(), by_date.get(&day)) {
            *total += value;
        }
        day += Duration::days(1);
    }

    let stats = rolling_stats(&totals);
    let mut weeks: Vec<WeeklyWorkloadPoint> = week_starts
        .into_iter()
        .zip(totals)
        .zip(stats)
        .map(|((week_start_date, weekly_total), (avg, std))| WeeklyWorkloadPoint {
            week_start_date,
            weekly_total,
            rolling_avg: avg,
            rolling_std_upper: avg + std,
            rolling_std_lower: (avg - std).max(0.0),
        })
        .collect();

    if weeks.len() > OUTPUT_WEEKS {
        weeks.drain(..weeks.len() - OUTPUT_WEEKS);
    }
    WeeklyWorkload { weeks }
}

/// Rolling mean and sample standard deviation, leading entries backfilled
fn rolling_stats(totals: &[f64]) -> Vec<(f64, f64)> {
    let mut stats = vec![None; totals.len()];
    for end in (ROLLING_WINDOW_WEEKS - 1)..totals.len() {
        let window = &totals[end + 1 - ROLLING_WINDOW_WEEKS..=end];
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let variance = window
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (window.len() - 1) as f64;
        stats[end] = Some((mean, variance.sqrt()));
    }

    // Backfill the warm-up weeks from the first defined window.
    let first_defined = stats.iter().flatten().next().copied().unwrap_or((0.0, 0.0));
    stats
        .into_iter()
        .map(|entry| entry.unwrap_or(first_defined))
        .collect()
}
