// ABOUTME: Activity models including ActivitySummary, TimeSeriesData, and load aggregates
// ABOUTME: Per-second sensor streams and the load-bearing summary fields the engine derives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time-series data for detailed activity analysis
///
/// Each channel is an ordered sequence of per-second observations; an absent
/// observation is `None`. Channels recorded for the same activity need not
/// have equal length.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesData {
    /// Power measurements (watts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Vec<Option<f64>>>,
    /// Heart rate measurements (BPM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<Vec<Option<f64>>>,
    /// Speed measurements (m/s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Vec<Option<f64>>>,
}

/// Summary of one recorded activity
///
/// Carries the load-bearing fields the engine reads and rewrites: power
/// summary statistics, the three load scores, and the unified training load
/// resolved from them. Descriptive fields (name, sport, route) live with the
/// excluded CRUD layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Unique activity identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Wall-clock start of the activity
    pub start_time: DateTime<Utc>,
    /// Moving time in seconds
    pub moving_time_seconds: u32,
    /// Average power in watts, absent when no power was recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_power: Option<u32>,
    /// Maximum power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_power: Option<u32>,
    /// Normalized power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_power: Option<u32>,
    /// Intensity factor (NP / FTP), 0.0 when no threshold was established
    pub intensity_factor: f64,
    /// Training Stress Score
    pub tss: u32,
    /// Zone-based Training Impulse
    pub trimp: u32,
    /// Rating of perceived exertion (1-10), entered by the athlete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceived_exertion: Option<u8>,
    /// Perceived Strain Score derived from RPE and duration
    pub perceived_strain_score: u32,
    /// Unified training load resolved from TSS / TRIMP / PSS
    pub unified_training_load: u32,
}

impl ActivitySummary {
    /// Create an empty summary for an athlete with only timing fields set
    #[must_use]
    pub fn new(athlete_id: Uuid, start_time: DateTime<Utc>, moving_time_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            athlete_id,
            start_time,
            moving_time_seconds,
            average_power: None,
            max_power: None,
            normalized_power: None,
            intensity_factor: 0.0,
            tss: 0,
            trimp: 0,
            perceived_exertion: None,
            perceived_strain_score: 0,
            unified_training_load: 0,
        }
    }

    /// Calendar date the activity started on
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// Aggregated training load for one (athlete, calendar date)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyLoadSummary {
    /// Sum of the day's unified training loads
    pub total_load: u32,
    /// Average intensity factor across the day's activities
    pub avg_if: f64,
}

/// Companion load metrics that can be paired with TSS for PSF fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMetric {
    /// Zone-based Training Impulse
    Trimp,
    /// Perceived Strain Score
    Pss,
}

/// Sums over activities where both TSS and a companion metric are strictly positive
///
/// Used by the PSF estimator to fit the empirical TSS-per-metric ratio.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DualMetricAggregates {
    /// Sum of TSS across the qualifying activities
    pub total_tss: f64,
    /// Sum of the companion metric across the qualifying activities
    pub total_metric: f64,
    /// Number of qualifying activities
    pub activity_count: u32,
}
