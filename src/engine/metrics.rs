// ABOUTME: Single-activity derived metrics: TSS, IF, TRIMP, PSS, virtual power
// ABOUTME: Total numeric functions with short-activity and missing-threshold fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Per-activity derived metrics.

use tracing::debug;
use velometrics_core::constants::time::{SECONDS_PER_HOUR_F64, SECONDS_PER_MINUTE_F64};
use velometrics_core::constants::units::MS_TO_KMH;
use velometrics_core::errors::{AppError, AppResult};
use velometrics_core::models::ActivitySummary;

use super::constants::power::TSS_BASE_MULTIPLIER;
use super::constants::trainer;
use super::rolling;
use super::zones::ZoneDistribution;
use crate::config::zones::TrimpWeights;

/// Training Stress Score from normalized power, FTP, and moving duration
///
/// `TSS = duration * NP * IF / (FTP * 3600) * 100` with `IF = NP / FTP`.
/// Any non-positive input yields 0 — an athlete without an established FTP
/// simply accrues no power-based stress, which is a valid outcome rather
/// than an error.
#[must_use]
pub fn training_stress_score(normalized_power: f64, ftp: f64, duration_seconds: f64) -> u32 {
    if normalized_power <= 0.0 || ftp <= 0.0 || duration_seconds <= 0.0 {
        return 0;
    }
    let intensity = normalized_power / ftp;
    let tss = duration_seconds * normalized_power * intensity / (ftp * SECONDS_PER_HOUR_F64)
        * TSS_BASE_MULTIPLIER;
    tss.round() as u32
}

/// Intensity factor (NP / FTP) rounded to two decimals, 0.0 without an FTP
#[must_use]
pub fn intensity_factor(normalized_power: f64, ftp: f64) -> f64 {
    if ftp <= 0.0 {
        return 0.0;
    }
    (normalized_power / ftp * 100.0).round() / 100.0
}

/// Zone-based Training Impulse from a heart-rate zone distribution
///
/// Minutes in each zone weighted by the per-zone multiplier and summed.
/// Zones absent from the weight table contribute nothing; an empty
/// distribution yields 0.
#[must_use]
pub fn trimp(distribution: &ZoneDistribution, weights: &TrimpWeights) -> u32 {
    let total: f64 = distribution
        .iter()
        .map(|(label, seconds)| seconds as f64 / SECONDS_PER_MINUTE_F64 * weights.weight(label))
        .sum();
    total.round() as u32
}

/// Perceived Strain Score from RPE and duration
///
/// `round(rpe * minutes)` when both are positive, 0 otherwise.
#[must_use]
pub fn perceived_strain_score(rpe: u8, duration_seconds: u32) -> u32 {
    if rpe == 0 || duration_seconds == 0 {
        return 0;
    }
    (f64::from(rpe) * f64::from(duration_seconds) / SECONDS_PER_MINUTE_F64).round() as u32
}

/// Estimated power for a fluid trainer at the given speed and resistance setting
///
/// Linear model with a constant coefficient delta between settings; see
/// [`trainer`](super::constants::trainer) for the model constants.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when the setting is outside
/// [1, 10]; out-of-range settings are rejected, never clamped.
pub fn estimate_virtual_power(speed_kmh: f64, setting: u8) -> AppResult<f64> {
    Ok(virtual_power_coefficient(setting)? * speed_kmh)
}

/// Replace an activity's power-derived statistics with virtual power
///
/// Only runs for activities with speed data but no measured power: when the
/// summary already carries positive average power, or the speed stream has no
/// positive samples, the summary is left untouched and `Ok(None)` is
/// returned. Otherwise a per-second power series is derived (absent or zero
/// speed contributes 0 W), the power summary statistics are overwritten, and
/// the generated series is returned for persistence.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for a resistance setting outside [1, 10],
/// before any field is touched.
pub fn recalculate_virtual_power(
    summary: &mut ActivitySummary,
    speed_ms: &[Option<f64>],
    setting: u8,
    ftp: f64,
) -> AppResult<Option<Vec<f64>>> {
    if summary.average_power.is_some_and(|watts| watts > 0) {
        return Ok(None);
    }
    // Validated up front so a bad setting cannot half-update the summary.
    let coefficient = virtual_power_coefficient(setting)?;

    let mut derived_any = false;
    let mut power = Vec::with_capacity(speed_ms.len());
    for sample in speed_ms {
        match sample {
            Some(speed) if *speed > 0.0 => {
                power.push((coefficient * speed * MS_TO_KMH).round());
                derived_any = true;
            }
            _ => power.push(0.0),
        }
    }
    if !derived_any {
        return Ok(None);
    }

    let count = power.len() as f64;
    let average = power.iter().sum::<f64>() / count;
    let max = power.iter().copied().fold(0.0_f64, f64::max);
    let series: Vec<Option<f64>> = power.iter().copied().map(Some).collect();
    let np = rolling::normalized_power(&series);

    summary.average_power = Some(average as u32);
    summary.max_power = Some(max as u32);
    summary.normalized_power = Some(np);
    summary.tss = training_stress_score(
        f64::from(np),
        ftp,
        f64::from(summary.moving_time_seconds),
    );
    summary.intensity_factor = intensity_factor(f64::from(np), ftp);
    debug!(
        activity_id = %summary.id,
        setting,
        normalized_power = np,
        "derived virtual power from speed stream"
    );

    Ok(Some(power))
}

fn virtual_power_coefficient(setting: u8) -> AppResult<f64> {
    if !(trainer::MIN_SETTING..=trainer::MAX_SETTING).contains(&setting) {
        return Err(AppError::invalid_input(format!(
            "Trainer setting must be between {} and {}, got {setting}",
            trainer::MIN_SETTING,
            trainer::MAX_SETTING
        )));
    }
    Ok(trainer::COEFFICIENT_STEP.mul_add(f64::from(setting - 1), trainer::BASE_COEFFICIENT))
}
