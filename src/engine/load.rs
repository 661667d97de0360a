// ABOUTME: Unified training-load resolution from TSS, TRIMP, and PSS
// ABOUTME: Strict fallback chain scaled by the athlete's personalized factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Unified training load.
//!
//! Every activity carries exactly one load number regardless of which sensors
//! it was recorded with. The resolver is a strict fallback chain — the
//! highest-fidelity score present wins outright, contributions are never
//! blended.

use velometrics_core::models::{ActivitySummary, ScalingFactors};

use super::metrics;

/// Resolve one unified load value from an activity's load scores
///
/// Priority: TSS when positive, else TRIMP scaled by the athlete's TRIMP
/// factor, else PSS scaled by the PSS factor, else 0.
#[must_use]
pub fn resolve_unified_load(tss: u32, trimp: u32, pss: u32, factors: &ScalingFactors) -> u32 {
    if tss > 0 {
        return tss;
    }
    if trimp > 0 {
        return (f64::from(trimp) * factors.trimp).round() as u32;
    }
    if pss > 0 {
        return (f64::from(pss) * factors.pss).round() as u32;
    }
    0
}

/// Re-resolve an activity's unified load in place
///
/// Called whenever any load-contributing field changes. The PSS is re-derived
/// from the athlete-entered RPE first, then the fallback chain re-evaluated.
pub fn apply_load_resolution(summary: &mut ActivitySummary, factors: &ScalingFactors) {
    if let Some(rpe) = summary.perceived_exertion {
        summary.perceived_strain_score =
            metrics::perceived_strain_score(rpe, summary.moving_time_seconds);
    }
    summary.unified_training_load = resolve_unified_load(
        summary.tss,
        summary.trimp,
        summary.perceived_strain_score,
        factors,
    );
}
