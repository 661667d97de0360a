// ABOUTME: Domain value types for the velometrics training-load platform
// ABOUTME: Re-exports activity, athlete, and performance model modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Domain value types.
//!
//! The engine holds no long-lived object graph; everything here is a small
//! value-aggregate fetched from and written back to the external store.

/// Activity summaries, time-series streams, and load aggregates
pub mod activity;

/// Athlete profile and personalized scaling factors
pub mod athlete;

/// Threshold history, daily performance metrics, and performance markers
pub mod performance;

pub use activity::{
    ActivitySummary, DailyLoadSummary, DualMetricAggregates, LoadMetric, TimeSeriesData,
};
pub use athlete::{AthleteProfile, ScalingFactors, DEFAULT_PSS_FACTOR, DEFAULT_TRIMP_FACTOR};
pub use performance::{
    DailyPerformanceMetric, MarkerStatus, MetricType, PotentialMarker, ThresholdMetric,
};
