// ABOUTME: Training-load computation engine module root
// ABOUTME: Rolling statistics, zone classification, derived metrics, PSF, and the PMC recurrence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! The training-load computation engine.
//!
//! Leaves first: [`rolling`] and [`zones`] operate on raw per-second streams;
//! [`metrics`] derives per-activity scores from them; [`load`] resolves one
//! unified load per activity; [`psf`] recalibrates the athlete's conversion
//! coefficients; [`pmc`] folds daily loads into the CTL/ATL/TSB chart;
//! [`markers`] turns standout efforts into pending threshold candidates.
//!
//! Every function here is total over sparse or zero-filled data; see the
//! crate-level error taxonomy.

use velometrics_core::errors::AppError;

/// Full per-activity analysis run at ingestion time
pub mod analysis;

/// Physiological and device model constants
pub mod constants;

/// Unified training-load resolution
pub mod load;

/// Automatic performance-marker detection and lifecycle
pub mod markers;

/// Single-activity derived metrics (TSS, IF, TRIMP, PSS, virtual power)
pub mod metrics;

/// Performance Management Chart recurrence and projection
pub mod pmc;

/// Personalized scaling factor estimation
pub mod psf;

/// Rolling-window statistics (windowed mean, NP, MMP, best windows)
pub mod rolling;

/// Weekly workload time-series analysis
pub mod workload;

/// Time-in-zone classification
pub mod zones;

pub use analysis::{ActivityAnalysis, ActivityAnalyzer};
pub use load::resolve_unified_load;
pub use markers::{detect_markers, MarkerAction};
pub use pmc::{daily_recurrence, DailyMetricView, DailyPmc, PmcEngine};
pub use rolling::{best_window_average, mmp_curve, normalized_power, windowed_mean, BestWindow};
pub use zones::{time_in_zones, ZoneDistribution};

/// Map a store failure into the engine error taxonomy
pub(crate) fn store_err(err: anyhow::Error) -> AppError {
    AppError::storage(err.to_string())
}
