// ABOUTME: Persistence abstraction for the training-load engine
// ABOUTME: Async trait over athletes, thresholds, activities, daily metrics, and markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Store abstraction.
//!
//! The engine never performs I/O directly; everything it reads or writes
//! beyond its own arguments goes through [`PerformanceStore`]. Implementations
//! are expected to provide simple get/upsert semantics keyed by id and date —
//! consistency across concurrent recalculations is handled above the store by
//! the engine's per-athlete serialization.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use velometrics_core::models::{
    ActivitySummary, AthleteProfile, DailyLoadSummary, DailyPerformanceMetric,
    DualMetricAggregates, LoadMetric, MarkerStatus, MetricType, PotentialMarker, ScalingFactors,
    ThresholdMetric,
};

/// In-memory reference implementation
pub mod memory;

pub use memory::InMemoryStore;

/// Core persistence trait consumed by the engine
///
/// All store implementations must provide a consistent interface for the
/// engine layer.
#[async_trait]
pub trait PerformanceStore: Send + Sync {
    // ================================
    // Athletes
    // ================================

    /// Create an athlete profile
    async fn create_athlete(&self, athlete: &AthleteProfile) -> Result<()>;

    /// Get an athlete profile by id
    async fn get_athlete(&self, athlete_id: Uuid) -> Result<Option<AthleteProfile>>;

    /// Persist recalibrated scaling factors for an athlete
    async fn update_scaling_factors(
        &self,
        athlete_id: Uuid,
        factors: ScalingFactors,
    ) -> Result<()>;

    // ================================
    // Threshold history
    // ================================

    /// Append a newly established threshold to the athlete's history
    async fn create_threshold(&self, athlete_id: Uuid, threshold: &ThresholdMetric) -> Result<()>;

    /// Latest threshold of the given kind established on or before `as_of`
    async fn latest_threshold(
        &self,
        athlete_id: Uuid,
        metric_type: MetricType,
        as_of: NaiveDate,
    ) -> Result<Option<ThresholdMetric>>;

    /// Full history of a threshold kind, ordered by establishment date
    async fn threshold_history(
        &self,
        athlete_id: Uuid,
        metric_type: MetricType,
    ) -> Result<Vec<ThresholdMetric>>;

    // ================================
    // Activities
    // ================================

    /// Create or replace an activity summary
    async fn upsert_activity(&self, activity: &ActivitySummary) -> Result<()>;

    /// Get an activity summary by id
    async fn get_activity(&self, activity_id: Uuid) -> Result<Option<ActivitySummary>>;

    /// Delete an activity, returning the removed summary when it existed
    async fn delete_activity(&self, activity_id: Uuid) -> Result<Option<ActivitySummary>>;

    /// Sum of unified loads and average IF for one (athlete, date)
    async fn daily_load_summary(
        &self,
        athlete_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyLoadSummary>;

    /// Aggregates over activities where TSS and the companion metric are both positive
    async fn dual_metric_aggregates(
        &self,
        athlete_id: Uuid,
        metric: LoadMetric,
    ) -> Result<Option<DualMetricAggregates>>;

    // ================================
    // Daily performance metrics
    // ================================

    /// Create or overwrite the row for (athlete, date)
    async fn upsert_daily_metric(&self, metric: &DailyPerformanceMetric) -> Result<()>;

    /// Most recent daily metric for an athlete
    async fn latest_daily_metric(&self, athlete_id: Uuid)
        -> Result<Option<DailyPerformanceMetric>>;

    /// Most recent daily metric strictly before the given date
    async fn latest_daily_metric_before(
        &self,
        athlete_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyPerformanceMetric>>;

    /// All daily metrics within an inclusive date range, ordered by date
    async fn daily_metrics_in_range(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformanceMetric>>;

    // ================================
    // Potential performance markers
    // ================================

    /// Persist a detected marker, returning its id
    async fn create_marker(&self, marker: &PotentialMarker) -> Result<Uuid>;

    /// Get a marker by id
    async fn get_marker(&self, marker_id: Uuid) -> Result<Option<PotentialMarker>>;

    /// All pending markers for an athlete, newest detection first
    async fn pending_markers(&self, athlete_id: Uuid) -> Result<Vec<PotentialMarker>>;

    /// Update a marker's lifecycle status
    async fn update_marker_status(&self, marker_id: Uuid, status: MarkerStatus) -> Result<()>;
}
