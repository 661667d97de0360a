// ABOUTME: Full per-activity analysis combining rolling stats, zones, metrics, and markers
// ABOUTME: Calculator struct parameterized by the athlete's thresholds, run at ingestion time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Per-activity analysis.
//!
//! The ingestion path hands the engine one [`TimeSeriesData`] per upload; the
//! analyzer derives every stream-dependent number in one pass so the CRUD
//! layer only has to persist the result. Thresholds are optional — an athlete
//! with no established FTP or LTHR gets zeroed power metrics and empty zone
//! times, not an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use velometrics_core::models::{PotentialMarker, TimeSeriesData};

use super::{markers, metrics, rolling, zones};
use crate::config::zones::{TrimpWeights, ZoneBands};

/// Stream-derived results for one activity
#[derive(Debug, Clone, Serialize)]
pub struct ActivityAnalysis {
    /// Normalized power in watts, 0 without power data
    pub normalized_power: u32,
    /// Intensity factor, 0.0 without an FTP
    pub intensity_factor: f64,
    /// Training Stress Score, 0 without an FTP
    pub tss: u32,
    /// Zone-based TRIMP, 0 without an LTHR or heart-rate data
    pub trimp: u32,
    /// Seconds per power zone
    pub power_zones: zones::ZoneDistribution,
    /// Seconds per heart-rate zone
    pub heart_rate_zones: zones::ZoneDistribution,
    /// Pending threshold candidates detected in this activity
    pub markers: Vec<PotentialMarker>,
}

/// Analyzer bound to one athlete's currently applicable thresholds
pub struct ActivityAnalyzer {
    ftp: Option<f64>,
    lthr: Option<f64>,
    power_bands: ZoneBands,
    heart_rate_bands: ZoneBands,
    trimp_weights: TrimpWeights,
}

impl Default for ActivityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityAnalyzer {
    /// Create an analyzer with the canonical band sets and no thresholds
    #[must_use]
    pub fn new() -> Self {
        Self {
            ftp: None,
            lthr: None,
            power_bands: ZoneBands::coggan_power(),
            heart_rate_bands: ZoneBands::heart_rate(),
            trimp_weights: TrimpWeights::default(),
        }
    }

    /// Set the athlete's thresholds applicable at the activity's start
    #[must_use]
    pub fn with_thresholds(mut self, ftp: Option<f64>, lthr: Option<f64>) -> Self {
        self.ftp = ftp;
        self.lthr = lthr;
        self
    }

    /// Derive every stream-dependent metric for one activity
    #[must_use]
    pub fn analyze(
        &self,
        streams: &TimeSeriesData,
        moving_time_seconds: u32,
        athlete_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> ActivityAnalysis {
        let power = streams.power.as_deref().unwrap_or(&[]);
        let heart_rate = streams.heart_rate.as_deref().unwrap_or(&[]);
        let ftp = self.ftp.unwrap_or(0.0);
        let lthr = self.lthr.unwrap_or(0.0);

        let normalized_power = rolling::normalized_power(power);
        let heart_rate_zones = zones::time_in_zones(heart_rate, lthr, &self.heart_rate_bands);

        ActivityAnalysis {
            normalized_power,
            intensity_factor: metrics::intensity_factor(f64::from(normalized_power), ftp),
            tss: metrics::training_stress_score(
                f64::from(normalized_power),
                ftp,
                f64::from(moving_time_seconds),
            ),
            trimp: metrics::trimp(&heart_rate_zones, &self.trimp_weights),
            power_zones: zones::time_in_zones(power, ftp, &self.power_bands),
            heart_rate_zones,
            markers: markers::detect_markers(
                power,
                heart_rate,
                self.ftp,
                self.lthr,
                athlete_id,
                started_at,
            ),
        }
    }
}
