// ABOUTME: DashMap-backed in-memory implementation of PerformanceStore
// ABOUTME: Reference store used by tests, benches, and the demo seeder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! In-memory store.
//!
//! Aggregate queries (daily load summaries, dual-metric sums) are computed by
//! scanning the activity table, mirroring what a SQL implementation would
//! express as `SUM`/`AVG` grouped queries.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use uuid::Uuid;
use velometrics_core::models::{
    ActivitySummary, AthleteProfile, DailyLoadSummary, DailyPerformanceMetric,
    DualMetricAggregates, LoadMetric, MarkerStatus, MetricType, PotentialMarker, ScalingFactors,
    ThresholdMetric,
};

use super::PerformanceStore;

/// Concurrent in-memory store keyed the same way the engine queries
#[derive(Debug, Default)]
pub struct InMemoryStore {
    athletes: DashMap<Uuid, AthleteProfile>,
    thresholds: DashMap<Uuid, Vec<ThresholdMetric>>,
    activities: DashMap<Uuid, ActivitySummary>,
    daily_metrics: DashMap<(Uuid, NaiveDate), DailyPerformanceMetric>,
    markers: DashMap<Uuid, PotentialMarker>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted daily metric rows across all athletes
    #[must_use]
    pub fn daily_metric_count(&self) -> usize {
        self.daily_metrics.len()
    }
}

#[async_trait]
impl PerformanceStore for InMemoryStore {
    async fn create_athlete(&self, athlete: &AthleteProfile) -> Result<()> {
        self.athletes.insert(athlete.id, athlete.clone());
        Ok(())
    }

    async fn get_athlete(&self, athlete_id: Uuid) -> Result<Option<AthleteProfile>> {
        Ok(self.athletes.get(&athlete_id).map(|entry| entry.clone()))
    }

    async fn update_scaling_factors(
        &self,
        athlete_id: Uuid,
        factors: ScalingFactors,
    ) -> Result<()> {
        let mut athlete = self
            .athletes
            .get_mut(&athlete_id)
            .ok_or_else(|| anyhow!("athlete {athlete_id} not found"))?;
        athlete.scaling_factors = factors;
        Ok(())
    }

    async fn create_threshold(&self, athlete_id: Uuid, threshold: &ThresholdMetric) -> Result<()> {
        self.thresholds
            .entry(athlete_id)
            .or_default()
            .push(*threshold);
        Ok(())
    }

    async fn latest_threshold(
        &self,
        athlete_id: Uuid,
        metric_type: MetricType,
        as_of: NaiveDate,
    ) -> Result<Option<ThresholdMetric>> {
        Ok(self.thresholds.get(&athlete_id).and_then(|history| {
            history
                .iter()
                .filter(|t| t.metric_type == metric_type && t.date_established <= as_of)
                .max_by_key(|t| t.date_established)
                .copied()
        }))
    }

    async fn threshold_history(
        &self,
        athlete_id: Uuid,
        metric_type: MetricType,
    ) -> Result<Vec<ThresholdMetric>> {
        let mut history: Vec<ThresholdMetric> = self
            .thresholds
            .get(&athlete_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|t| t.metric_type == metric_type)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        history.sort_by_key(|t| t.date_established);
        Ok(history)
    }

    async fn upsert_activity(&self, activity: &ActivitySummary) -> Result<()> {
        self.activities.insert(activity.id, activity.clone());
        Ok(())
    }

    async fn get_activity(&self, activity_id: Uuid) -> Result<Option<ActivitySummary>> {
        Ok(self.activities.get(&activity_id).map(|entry| entry.clone()))
    }

    async fn delete_activity(&self, activity_id: Uuid) -> Result<Option<ActivitySummary>> {
        Ok(self.activities.remove(&activity_id).map(|(_, a)| a))
    }

    async fn daily_load_summary(
        &self,
        athlete_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyLoadSummary> {
        let mut total_load = 0_u32;
        let mut if_sum = 0.0;
        let mut count = 0_u32;
        for entry in &self.activities {
            let activity = entry.value();
            if activity.athlete_id == athlete_id && activity.start_date() == date {
                total_load += activity.unified_training_load;
                if_sum += activity.intensity_factor;
                count += 1;
            }
        }
        let avg_if = if count > 0 { if_sum / f64::from(count) } else { 0.0 };
        Ok(DailyLoadSummary { total_load, avg_if })
    }

    async fn dual_metric_aggregates(
        &self,
        athlete_id: Uuid,
        metric: LoadMetric,
    ) -> Result<Option<DualMetricAggregates>> {
        let mut aggregates = DualMetricAggregates::default();
        for entry in &self.activities {
            let activity = entry.value();
            if activity.athlete_id != athlete_id || activity.tss == 0 {
                continue;
            }
            let companion = match metric {
                LoadMetric::Trimp => activity.trimp,
                LoadMetric::Pss => activity.perceived_strain_score,
            };
            if companion > 0 {
                aggregates.total_tss += f64::from(activity.tss);
                aggregates.total_metric += f64::from(companion);
                aggregates.activity_count += 1;
            }
        }
        Ok((aggregates.activity_count > 0).then_some(aggregates))
    }

    async fn upsert_daily_metric(&self, metric: &DailyPerformanceMetric) -> Result<()> {
        self.daily_metrics
            .insert((metric.athlete_id, metric.date), *metric);
        Ok(())
    }

    async fn latest_daily_metric(
        &self,
        athlete_id: Uuid,
    ) -> Result<Option<DailyPerformanceMetric>> {
        Ok(self
            .daily_metrics
            .iter()
            .filter(|entry| entry.key().0 == athlete_id)
            .max_by_key(|entry| entry.key().1)
            .map(|entry| *entry.value()))
    }

    async fn latest_daily_metric_before(
        &self,
        athlete_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyPerformanceMetric>> {
        Ok(self
            .daily_metrics
            .iter()
            .filter(|entry| entry.key().0 == athlete_id && entry.key().1 < date)
            .max_by_key(|entry| entry.key().1)
            .map(|entry| *entry.value()))
    }

    async fn daily_metrics_in_range(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPerformanceMetric>> {
        let mut rows: Vec<DailyPerformanceMetric> = self
            .daily_metrics
            .iter()
            .filter(|entry| {
                let (owner, date) = *entry.key();
                owner == athlete_id && date >= start && date <= end
            })
            .map(|entry| *entry.value())
            .collect();
        rows.sort_by_key(|row| row.date);
        Ok(rows)
    }

    async fn create_marker(&self, marker: &PotentialMarker) -> Result<Uuid> {
        self.markers.insert(marker.id, marker.clone());
        Ok(marker.id)
    }

    async fn get_marker(&self, marker_id: Uuid) -> Result<Option<PotentialMarker>> {
        Ok(self.markers.get(&marker_id).map(|entry| entry.clone()))
    }

    async fn pending_markers(&self, athlete_id: Uuid) -> Result<Vec<PotentialMarker>> {
        let mut pending: Vec<PotentialMarker> = self
            .markers
            .iter()
            .filter(|entry| {
                entry.value().athlete_id == athlete_id
                    && entry.value().status == MarkerStatus::Pending
            })
            .map(|entry| entry.value().clone())
            .collect();
        pending.sort_by(|a, b| b.date_detected.cmp(&a.date_detected));
        Ok(pending)
    }

    async fn update_marker_status(&self, marker_id: Uuid, status: MarkerStatus) -> Result<()> {
        let mut marker = self
            .markers
            .get_mut(&marker_id)
            .ok_or_else(|| anyhow!("marker {marker_id} not found"))?;
        marker.status = status;
        Ok(())
    }
}
