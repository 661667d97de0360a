// ABOUTME: Performance models: threshold history, daily PMC rows, potential markers
// ABOUTME: Value types persisted per athlete by the external store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of physiological threshold metrics tracked per athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Functional Threshold Power (watts)
    Ftp,
    /// Lactate Threshold Heart Rate (beats/min)
    Lthr,
    /// Body weight (kilograms)
    Weight,
}

/// A single established threshold value
///
/// Thresholds form a time-ordered history per athlete; the applicable value
/// for any instant is the latest one with `date_established` on or before it.
/// A threshold is never mutated, only superseded by a newer one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdMetric {
    /// Which threshold this value establishes
    pub metric_type: MetricType,
    /// The threshold value (watts, bpm, or kg depending on the metric)
    pub value: f64,
    /// Date from which this value applies
    pub date_established: NaiveDate,
}

/// One row of the Performance Management Chart for an (athlete, calendar date)
///
/// `tsb == ctl - atl` always. Rows are created and overwritten only by the
/// PMC recurrence engine, keyed on (athlete, date) with upsert semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyPerformanceMetric {
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Calendar date of the row
    pub date: NaiveDate,
    /// Chronic Training Load (42-day exponentially-smoothed fitness)
    pub ctl: f64,
    /// Acute Training Load (7-day exponentially-smoothed fatigue)
    pub atl: f64,
    /// Training Stress Balance (`ctl - atl`, freshness proxy)
    pub tsb: f64,
    /// The day's total unified training load
    pub tss: u32,
    /// The day's average intensity factor
    pub if_avg: f64,
}

/// Lifecycle state of a potential performance marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    /// Awaiting athlete confirmation
    Pending,
    /// Confirmed; a new threshold has been established from it
    Accepted,
    /// Rejected by the athlete
    Dismissed,
}

/// A candidate threshold value detected from an activity
///
/// Created only by per-activity analysis, and only when the detected value
/// exceeds the currently applicable threshold. Transitions out of `Pending`
/// happen exclusively through explicit athlete action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PotentialMarker {
    /// Unique marker identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Threshold kind the candidate would establish
    pub metric_type: MetricType,
    /// Candidate threshold value
    pub value: f64,
    /// Instant of the activity the candidate was detected in
    pub date_detected: DateTime<Utc>,
    /// Current lifecycle state
    pub status: MarkerStatus,
}
