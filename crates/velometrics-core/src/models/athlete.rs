// ABOUTME: Athlete profile model and personalized scaling factors
// ABOUTME: PSF coefficients converting TRIMP and PSS into TSS-equivalent load units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default TRIMP-to-TSS conversion factor before any personalization
pub const DEFAULT_TRIMP_FACTOR: f64 = 0.42;

/// Default PSS-to-TSS conversion factor before any personalization
pub const DEFAULT_PSS_FACTOR: f64 = 0.24;

/// Personalized scaling factors converting TRIMP / PSS into TSS-equivalent units
///
/// Recalibrated after every activity change that touches load fields. Each
/// factor is a convex combination of the default and an empirically fitted
/// ratio, so it stays bounded by the two as sample size grows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScalingFactors {
    /// TRIMP-to-TSS conversion factor
    pub trimp: f64,
    /// PSS-to-TSS conversion factor
    pub pss: f64,
}

impl Default for ScalingFactors {
    fn default() -> Self {
        Self {
            trimp: DEFAULT_TRIMP_FACTOR,
            pss: DEFAULT_PSS_FACTOR,
        }
    }
}

/// An athlete as the engine sees one: an identity plus calibration state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Unique athlete identifier
    pub id: Uuid,
    /// Display name
    pub display_name: String,
    /// Current personalized scaling factors
    pub scaling_factors: ScalingFactors,
}

impl AthleteProfile {
    /// Create a profile with default scaling factors
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            scaling_factors: ScalingFactors::default(),
        }
    }
}
