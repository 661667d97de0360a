// ABOUTME: Performance Management Chart recurrence engine (CTL/ATL/TSB)
// ABOUTME: Idempotent day-by-day recalculation plus read-only gap-filling projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! The PMC recurrence engine.
//!
//! One row per (athlete, calendar day) carrying chronic load, acute load, and
//! their balance. The recurrence is a sequential fold — each day depends on
//! the previous one — so recalculation walks an explicit date loop carrying
//! `(ctl, atl)` as fold state, never recursing, and multi-year histories stay
//! flat on the stack. Re-running from any date reproduces the same forward
//! sequence given the same activity data.

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;
use velometrics_core::errors::{AppError, AppResult};
use velometrics_core::models::DailyPerformanceMetric;

use super::store_err;
use crate::config::PmcConfig;
use crate::store::PerformanceStore;

/// Single-day PMC state after applying the recurrence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPmc {
    /// Chronic Training Load
    pub ctl: f64,
    /// Acute Training Load
    pub atl: f64,
    /// Training Stress Balance (`ctl - atl`)
    pub tsb: f64,
}

/// One day of PMC data as served to a caller
///
/// `projected` rows are synthesized on the read path by decaying the last
/// known state toward zero load; they are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyMetricView {
    /// Calendar date
    pub date: NaiveDate,
    /// Chronic Training Load
    pub ctl: f64,
    /// Acute Training Load
    pub atl: f64,
    /// Training Stress Balance
    pub tsb: f64,
    /// The day's total unified training load
    pub tss: u32,
    /// The day's average intensity factor
    pub if_avg: f64,
    /// Whether this row was synthesized rather than read from the store
    pub projected: bool,
}

/// Apply the exponential-decay recurrence for one day
///
/// `ctl_t = ctl_{t-1} + (tss_t - ctl_{t-1}) / 42` and
/// `atl_t = atl_{t-1} + (tss_t - atl_{t-1}) / 7`, with the time constants
/// taken from configuration.
#[must_use]
pub fn daily_recurrence(
    ctl_yesterday: f64,
    atl_yesterday: f64,
    tss_today: f64,
    config: &PmcConfig,
) -> DailyPmc {
    let ctl = ctl_yesterday + (tss_today - ctl_yesterday) / config.ctl_time_constant;
    let atl = atl_yesterday + (tss_today - atl_yesterday) / config.atl_time_constant;
    DailyPmc {
        ctl,
        atl,
        tsb: ctl - atl,
    }
}

/// Recurrence engine bound to a store
///
/// Concurrent recalculations for the same athlete are serialized through a
/// per-athlete mutex: the day loop reads-then-overwrites a shared day-indexed
/// table, and out-of-order writes would corrupt the `(ctl, atl)` chain.
/// Different athletes recalculate independently and in parallel.
pub struct PmcEngine {
    store: Arc<dyn PerformanceStore>,
    config: PmcConfig,
    athlete_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl PmcEngine {
    /// Create an engine over a store with the given recurrence constants
    #[must_use]
    pub fn new(store: Arc<dyn PerformanceStore>, config: PmcConfig) -> Self {
        Self {
            store,
            config,
            athlete_locks: DashMap::new(),
        }
    }

    /// Recalculate all PMC rows for an athlete from a date forward
    ///
    /// Invoked whenever an activity is created, edited with changed load
    /// fields, or deleted. Ends at today or the latest persisted row,
    /// whichever is later, so future-dated projections already in the store
    /// are re-derived rather than truncated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageError` when the store fails.
    pub async fn recalculate(&self, athlete_id: Uuid, from_date: NaiveDate) -> AppResult<()> {
        self.recalculate_as_of(athlete_id, from_date, Utc::now().date_naive())
            .await
    }

    /// Recalculate with an explicit notion of "today"
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageError` when the store fails.
    pub async fn recalculate_as_of(
        &self,
        athlete_id: Uuid,
        from_date: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<()> {
        let lock = self.lock_for(athlete_id);
        let _guard = lock.lock().await;

        // Seed from the last state before the edit; a store with no history
        // at all starts the chain from zero rather than failing.
        let (mut ctl, mut atl) = self
            .store
            .latest_daily_metric_before(athlete_id, from_date)
            .await
            .map_err(store_err)?
            .map_or((0.0, 0.0), |metric| (metric.ctl, metric.atl));

        let mut end_date = today;
        if let Some(latest) = self
            .store
            .latest_daily_metric(athlete_id)
            .await
            .map_err(store_err)?
        {
            if latest.date > end_date {
                end_date = latest.date;
            }
        }

        let mut day = from_date;
        let mut days = 0_u32;
        while day <= end_date {
            let summary = self
                .store
                .daily_load_summary(athlete_id, day)
                .await
                .map_err(store_err)?;
            let pmc = daily_recurrence(ctl, atl, f64::from(summary.total_load), &self.config);
            self.store
                .upsert_daily_metric(&DailyPerformanceMetric {
                    athlete_id,
                    date: day,
                    ctl: pmc.ctl,
                    atl: pmc.atl,
                    tsb: pmc.tsb,
                    tss: summary.total_load,
                    if_avg: summary.avg_if,
                })
                .await
                .map_err(store_err)?;
            ctl = pmc.ctl;
            atl = pmc.atl;
            day = next_day(day)?;
            days += 1;
        }

        debug!(
            %athlete_id,
            from = %from_date,
            to = %end_date,
            days,
            "recalculated performance management chart"
        );
        Ok(())
    }

    /// Serve PMC data for a date range, filling gaps with decayed projections
    ///
    /// Persisted rows pass through unchanged; days without a row are
    /// synthesized by decaying the last known state toward a load of zero.
    /// Nothing is written — the projection exists only for this read.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the range is reversed and
    /// `AppError::StorageError` when the store fails.
    pub async fn project_range(
        &self,
        athlete_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<DailyMetricView>> {
        if end_date < start_date {
            return Err(AppError::invalid_input(format!(
                "end date {end_date} precedes start date {start_date}"
            )));
        }

        let (mut ctl, mut atl) = self
            .store
            .latest_daily_metric_before(athlete_id, start_date)
            .await
            .map_err(store_err)?
            .map_or((0.0, 0.0), |metric| (metric.ctl, metric.atl));

        let persisted: HashMap<NaiveDate, DailyPerformanceMetric> = self
            .store
            .daily_metrics_in_range(athlete_id, start_date, end_date)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|metric| (metric.date, metric))
            .collect();

        let mut views = Vec::new();
        let mut day = start_date;
        while day <= end_date {
            if let Some(metric) = persisted.get(&day) {
                ctl = metric.ctl;
                atl = metric.atl;
                views.push(DailyMetricView {
                    date: metric.date,
                    ctl: metric.ctl,
                    atl: metric.atl,
                    tsb: metric.tsb,
                    tss: metric.tss,
                    if_avg: metric.if_avg,
                    projected: false,
                });
            } else {
                let pmc = daily_recurrence(ctl, atl, 0.0, &self.config);
                ctl = pmc.ctl;
                atl = pmc.atl;
                views.push(DailyMetricView {
                    date: day,
                    ctl: pmc.ctl,
                    atl: pmc.atl,
                    tsb: pmc.tsb,
                    tss: 0,
                    if_avg: 0.0,
                    projected: true,
                });
            }
            day = next_day(day)?;
        }
        Ok(views)
    }

    fn lock_for(&self, athlete_id: Uuid) -> Arc<Mutex<()>> {
        self.athlete_locks
            .entry(athlete_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn next_day(day: NaiveDate) -> AppResult<NaiveDate> {
    day.succ_opt()
        .ok_or_else(|| AppError::internal(format!("calendar overflow past {day}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_matches_closed_form() {
        let config = PmcConfig::default();
        let pmc = daily_recurrence(50.0, 70.0, 80.0, &config);
        assert!((pmc.ctl - (50.0 + 30.0 / 42.0)).abs() < 1e-9);
        assert!((pmc.atl - (70.0 + 10.0 / 7.0)).abs() < 1e-9);
        assert!((pmc.tsb - (pmc.ctl - pmc.atl)).abs() < 1e-9);
    }

    #[test]
    fn test_rest_day_decays_toward_zero() {
        let config = PmcConfig::default();
        let pmc = daily_recurrence(50.0, 70.0, 0.0, &config);
        assert!(pmc.ctl < 50.0);
        assert!(pmc.atl < 70.0);
        assert!(pmc.tsb > 50.0 - 70.0);
    }
}
