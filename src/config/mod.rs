// ABOUTME: Engine configuration types with defaults and environment overrides
// ABOUTME: PMC time constants, PSF defaults and smoothing, MMP duration grid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Engine configuration.
//!
//! Every tunable the engine reads is an explicit configuration value passed
//! into the computation, never a module-level singleton. Defaults come from
//! named constants; each scalar can be overridden through the environment.

use serde::{Deserialize, Serialize};
use std::env;
use velometrics_core::models::{DEFAULT_PSS_FACTOR, DEFAULT_TRIMP_FACTOR};

/// Zone band definitions and TRIMP weights
pub mod zones;

pub use zones::{TrimpWeights, ZoneBand, ZoneBands};

/// Chronic Training Load time constant (days)
pub const CTL_TIME_CONSTANT: f64 = 42.0;

/// Acute Training Load time constant (days)
pub const ATL_TIME_CONSTANT: f64 = 7.0;

/// Number of dual-data activities needed to reach full PSF confidence
pub const PSF_SMOOTHING_ACTIVITIES: u32 = 5;

/// Standard duration grid for mean-maximal-power curves (seconds)
pub const MMP_DURATIONS_SECONDS: [u32; 19] = [
    1, 5, 10, 15, 30, 60, 90, 120, 180, 240, 300, 360, 480, 600, 900, 1200, 1800, 2700, 3600,
];

/// Time constants of the PMC exponential-decay recurrence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PmcConfig {
    /// Chronic Training Load time constant (days)
    pub ctl_time_constant: f64,
    /// Acute Training Load time constant (days)
    pub atl_time_constant: f64,
}

impl Default for PmcConfig {
    fn default() -> Self {
        Self {
            ctl_time_constant: CTL_TIME_CONSTANT,
            atl_time_constant: ATL_TIME_CONSTANT,
        }
    }
}

impl PmcConfig {
    /// Load PMC configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ctl_time_constant: env_f64("PMC_CTL_TIME_CONSTANT", CTL_TIME_CONSTANT),
            atl_time_constant: env_f64("PMC_ATL_TIME_CONSTANT", ATL_TIME_CONSTANT),
        }
    }
}

/// Defaults and smoothing horizon for personalized scaling factors
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PsfConfig {
    /// Default TRIMP-to-TSS factor before personalization
    pub default_trimp: f64,
    /// Default PSS-to-TSS factor before personalization
    pub default_pss: f64,
    /// Activities needed to reach full confidence in the fitted ratio
    pub smoothing_activities: u32,
}

impl Default for PsfConfig {
    fn default() -> Self {
        Self {
            default_trimp: DEFAULT_TRIMP_FACTOR,
            default_pss: DEFAULT_PSS_FACTOR,
            smoothing_activities: PSF_SMOOTHING_ACTIVITIES,
        }
    }
}

impl PsfConfig {
    /// Load PSF configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            default_trimp: env_f64("PSF_DEFAULT_TRIMP", DEFAULT_TRIMP_FACTOR),
            default_pss: env_f64("PSF_DEFAULT_PSS", DEFAULT_PSS_FACTOR),
            smoothing_activities: env::var("PSF_SMOOTHING_ACTIVITIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(PSF_SMOOTHING_ACTIVITIES),
        }
    }
}

/// Engine-wide configuration bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// PMC recurrence time constants
    pub pmc: PmcConfig,
    /// Personalized scaling factor calibration
    pub psf: PsfConfig,
    /// Duration grid for MMP curves (seconds, ascending)
    pub mmp_durations: Vec<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pmc: PmcConfig::default(),
            psf: PsfConfig::default(),
            mmp_durations: MMP_DURATIONS_SECONDS.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            pmc: PmcConfig::from_env(),
            psf: PsfConfig::from_env(),
            mmp_durations: MMP_DURATIONS_SECONDS.to_vec(),
        }
    }
}

fn env_f64(name: &str, fallback: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}
