// ABOUTME: Automatic performance-marker detection from standout 20-minute efforts
// ABOUTME: Pending FTP/LTHR candidates plus the explicit accept/dismiss lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Performance marker detection and lifecycle.
//!
//! A marker is only ever a *candidate*: detection creates it pending, and it
//! becomes a real threshold exclusively through an explicit accept. Nothing
//! here transitions a marker automatically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use velometrics_core::errors::{AppError, AppResult};
use velometrics_core::models::{MarkerStatus, MetricType, PotentialMarker, ThresholdMetric};

use super::constants::power::{FTP_FROM_BEST_WINDOW_FACTOR, THRESHOLD_DETECTION_WINDOW_MINUTES};
use super::{rolling, store_err};
use crate::store::PerformanceStore;

/// Explicit athlete decision on a pending marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerAction {
    /// Establish a new threshold from the candidate value
    Accept,
    /// Discard the candidate
    Dismiss,
}

/// Detect pending threshold candidates from an activity's streams
///
/// The best 20-minute power window drives both detections: 95% of its mean
/// power is the estimated FTP, and the mean heart rate over that exact same
/// window (skipping absent samples) is the estimated LTHR. A candidate is
/// emitted only when it exceeds the currently applicable threshold, or no
/// threshold is established yet. Activities shorter than the detection window
/// produce no markers.
#[must_use]
pub fn detect_markers(
    power: &[Option<f64>],
    heart_rate: &[Option<f64>],
    current_ftp: Option<f64>,
    current_lthr: Option<f64>,
    athlete_id: Uuid,
    detected_at: DateTime<Utc>,
) -> Vec<PotentialMarker> {
    let Some(best) = rolling::best_window_average(power, THRESHOLD_DETECTION_WINDOW_MINUTES)
    else {
        return Vec::new();
    };

    let mut markers = Vec::new();

    let estimated_ftp = best.value * FTP_FROM_BEST_WINDOW_FACTOR;
    if estimated_ftp > current_ftp.unwrap_or(0.0) {
        markers.push(PotentialMarker {
            id: Uuid::new_v4(),
            athlete_id,
            metric_type: MetricType::Ftp,
            value: estimated_ftp.round(),
            date_detected: detected_at,
            status: MarkerStatus::Pending,
        });
    }

    if best.start_index < heart_rate.len() {
        let end = best.end_index.min(heart_rate.len() - 1);
        let window_hr: Vec<f64> = heart_rate[best.start_index..=end]
            .iter()
            .flatten()
            .copied()
            .collect();
        if !window_hr.is_empty() {
            let estimated_lthr = window_hr.iter().sum::<f64>() / window_hr.len() as f64;
            if estimated_lthr > current_lthr.unwrap_or(0.0) {
                markers.push(PotentialMarker {
                    id: Uuid::new_v4(),
                    athlete_id,
                    metric_type: MetricType::Lthr,
                    value: estimated_lthr.round(),
                    date_detected: detected_at,
                    status: MarkerStatus::Pending,
                });
            }
        }
    }

    if !markers.is_empty() {
        debug!(
            %athlete_id,
            count = markers.len(),
            best_window_watts = best.value,
            "detected potential performance markers"
        );
    }
    markers
}

/// Apply an explicit athlete decision to a pending marker
///
/// Accepting spawns a new threshold effective from the detection date and
/// moves the marker to `Accepted`; dismissing moves it to `Dismissed`.
///
/// # Errors
///
/// Returns `AppError::ResourceNotFound` for an unknown marker,
/// `AppError::InvalidInput` when the marker is not pending, and
/// `AppError::StorageError` when the store fails.
pub async fn apply_marker_action(
    store: &dyn PerformanceStore,
    marker_id: Uuid,
    action: MarkerAction,
) -> AppResult<PotentialMarker> {
    let mut marker = store
        .get_marker(marker_id)
        .await
        .map_err(store_err)?
        .ok_or_else(|| AppError::not_found(format!("marker {marker_id}")))?;

    if marker.status != MarkerStatus::Pending {
        return Err(AppError::invalid_input(
            "only pending markers can be accepted or dismissed",
        ));
    }

    match action {
        MarkerAction::Accept => {
            let threshold = ThresholdMetric {
                metric_type: marker.metric_type,
                value: marker.value,
                date_established: marker.date_detected.date_naive(),
            };
            store
                .create_threshold(marker.athlete_id, &threshold)
                .await
                .map_err(store_err)?;
            marker.status = MarkerStatus::Accepted;
        }
        MarkerAction::Dismiss => marker.status = MarkerStatus::Dismissed,
    }

    store
        .update_marker_status(marker_id, marker.status)
        .await
        .map_err(store_err)?;
    Ok(marker)
}
