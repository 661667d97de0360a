// ABOUTME: Personalized scaling factor estimation from dual-data activity aggregates
// ABOUTME: Confidence-weighted blend of defaults with the empirically fitted TSS ratio
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Personalized scaling factors.
//!
//! Runs once per athlete after any activity create/update/delete that touches
//! load fields. Activities recorded with both a power meter and a heart-rate
//! strap (or an RPE entry) reveal the athlete's true TSS-per-TRIMP and
//! TSS-per-PSS ratios; the estimator blends those fitted ratios with the
//! population defaults, weighted by how many such activities exist.

use tracing::debug;
use uuid::Uuid;
use velometrics_core::errors::{AppError, AppResult};
use velometrics_core::models::{DualMetricAggregates, LoadMetric, ScalingFactors};

use super::store_err;
use crate::config::PsfConfig;
use crate::store::PerformanceStore;

/// Recalculate and persist an athlete's personalized scaling factors
///
/// For each companion metric the fitted ratio is `total_tss / total_metric`
/// over the activities where both are strictly positive, blended with the
/// default at `weight = min(count, smoothing) / smoothing`. A metric with no
/// qualifying activities leaves its factor untouched — factors are never
/// reset to defaults once personalized.
///
/// # Errors
///
/// Returns `AppError::ResourceNotFound` for an unknown athlete and
/// `AppError::StorageError` when the store fails.
pub async fn update_scaling_factors(
    store: &dyn PerformanceStore,
    athlete_id: Uuid,
    config: &PsfConfig,
) -> AppResult<ScalingFactors> {
    let athlete = store
        .get_athlete(athlete_id)
        .await
        .map_err(store_err)?
        .ok_or_else(|| AppError::not_found(format!("athlete {athlete_id}")))?;
    let mut factors = athlete.scaling_factors;

    if let Some(aggregates) = store
        .dual_metric_aggregates(athlete_id, LoadMetric::Trimp)
        .await
        .map_err(store_err)?
    {
        if aggregates.total_metric > 0.0 {
            factors.trimp = blended_factor(&aggregates, config.default_trimp, config);
        }
    }

    if let Some(aggregates) = store
        .dual_metric_aggregates(athlete_id, LoadMetric::Pss)
        .await
        .map_err(store_err)?
    {
        if aggregates.total_metric > 0.0 {
            factors.pss = blended_factor(&aggregates, config.default_pss, config);
        }
    }

    store
        .update_scaling_factors(athlete_id, factors)
        .await
        .map_err(store_err)?;
    debug!(
        %athlete_id,
        psf_trimp = factors.trimp,
        psf_pss = factors.pss,
        "recalibrated personalized scaling factors"
    );
    Ok(factors)
}

fn blended_factor(aggregates: &DualMetricAggregates, default: f64, config: &PsfConfig) -> f64 {
    let fitted = aggregates.total_tss / aggregates.total_metric;
    let weight = f64::from(aggregates.activity_count.min(config.smoothing_activities))
        / f64::from(config.smoothing_activities);
    fitted.mul_add(weight, default * (1.0 - weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_converges_to_fitted_ratio_with_sample_size() {
        let config = PsfConfig::default();
        let one = DualMetricAggregates {
            total_tss: 100.0,
            total_metric: 200.0,
            activity_count: 1,
        };
        // weight 0.2: 0.5 * 0.2 + 0.42 * 0.8
        assert!((blended_factor(&one, config.default_trimp, &config) - 0.436).abs() < 1e-9);

        let many = DualMetricAggregates {
            total_tss: 500.0,
            total_metric: 1000.0,
            activity_count: 9,
        };
        assert!((blended_factor(&many, config.default_trimp, &config) - 0.5).abs() < 1e-9);
    }
}
