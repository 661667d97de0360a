// ABOUTME: Rolling-window statistics over per-second sensor streams
// ABOUTME: Windowed mean primitive, normalized power, MMP curves, best-window search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Rolling-window statistics.
//!
//! Everything in this module is built on one windowed-mean primitive with a
//! strict validity rule: a window containing any absent sample is undefined.
//! This all-or-nothing rule is a deliberate policy, not a gap to be fixed by
//! imputing samples — downstream consumers skip undefined windows instead.

use rayon::prelude::*;
use serde::Serialize;
use velometrics_core::constants::time::SECONDS_PER_MINUTE;

use super::constants::power::NP_ROLLING_WINDOW_SECONDS;

/// Result of a best-window search over a per-second stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestWindow {
    /// Highest windowed mean found
    pub value: f64,
    /// Inclusive index of the first sample in the winning window
    pub start_index: usize,
    /// Inclusive index of the last sample in the winning window
    pub end_index: usize,
}

/// One point on a mean-maximal-power curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MmpPoint {
    /// Window length in seconds
    pub duration_seconds: u32,
    /// Best average power sustained over that window, rounded to whole watts
    pub power: u32,
}

/// Fixed-window moving average over a per-second stream
///
/// The value at index `i` (for `i >= window - 1`) is the arithmetic mean of
/// the `window` samples ending at `i`. Earlier indices, and every window
/// containing a `None` sample, hold `f64::NAN`.
///
/// Runs in O(n) with a sliding sum so multi-hour activities stay tractable.
#[must_use]
pub fn windowed_mean(series: &[Option<f64>], window: usize) -> Vec<f64> {
    let mut means = vec![f64::NAN; series.len()];
    if window == 0 || series.len() < window {
        return means;
    }

    let divisor = window as f64;
    let mut sum = 0.0;
    let mut missing = 0_usize;
    for (i, sample) in series.iter().enumerate() {
        match sample {
            Some(value) => sum += value,
            None => missing += 1,
        }
        if i >= window {
            match series[i - window] {
                Some(value) => sum -= value,
                None => missing -= 1,
            }
        }
        if i + 1 >= window && missing == 0 {
            means[i] = sum / divisor;
        }
    }
    means
}

/// Normalized power over a per-second power stream
///
/// 30-second rolling mean, raised to the 4th power, averaged over the defined
/// windows, 4th root, rounded to whole watts. Activities too short (or too
/// gap-ridden) to yield a single defined window fall back to the plain
/// average of the present samples; an empty stream yields 0.
#[must_use]
pub fn normalized_power(series: &[Option<f64>]) -> u32 {
    if series.is_empty() {
        return 0;
    }

    let rolling = windowed_mean(series, NP_ROLLING_WINDOW_SECONDS);
    let mut sum_fourth = 0.0;
    let mut defined = 0_usize;
    for mean in rolling.iter().filter(|m| !m.is_nan()) {
        sum_fourth += mean.powi(4);
        defined += 1;
    }

    if defined == 0 {
        let present: Vec<f64> = series.iter().flatten().copied().collect();
        if present.is_empty() {
            return 0;
        }
        let average = present.iter().sum::<f64>() / present.len() as f64;
        return round_watts(average);
    }

    round_watts((sum_fourth / defined as f64).powf(0.25))
}

/// Mean-maximal-power curve over a fixed duration grid
///
/// For each duration no longer than the stream, the best defined windowed
/// mean is emitted; durations with no defined window are omitted. The input
/// duration order is preserved. Durations are evaluated in parallel.
#[must_use]
pub fn mmp_curve(series: &[Option<f64>], durations: &[u32]) -> Vec<MmpPoint> {
    if series.is_empty() {
        return Vec::new();
    }

    durations
        .par_iter()
        .filter_map(|&duration| {
            let window = duration as usize;
            if window == 0 || window > series.len() {
                return None;
            }
            let best = max_defined(&windowed_mean(series, window))?;
            Some(MmpPoint {
                duration_seconds: duration,
                power: round_watts(best),
            })
        })
        .collect()
}

/// Best N-minute average over a per-second stream
///
/// Returns `None` when the stream is shorter than the interval or no window
/// is defined. Ties are broken toward the earliest window.
#[must_use]
pub fn best_window_average(series: &[Option<f64>], interval_minutes: u32) -> Option<BestWindow> {
    let window = (interval_minutes * SECONDS_PER_MINUTE) as usize;
    if window == 0 || series.len() < window {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (end, mean) in windowed_mean(series, window).iter().enumerate() {
        if mean.is_nan() {
            continue;
        }
        // Strict comparison keeps the earliest window on ties.
        if best.is_none_or(|(_, current)| *mean > current) {
            best = Some((end, *mean));
        }
    }

    best.map(|(end_index, value)| BestWindow {
        value,
        start_index: end_index + 1 - window,
        end_index,
    })
}

fn max_defined(means: &[f64]) -> Option<f64> {
    let best = means
        .iter()
        .copied()
        .filter(|m| !m.is_nan())
        .fold(f64::NAN, f64::max);
    if best.is_nan() {
        None
    } else {
        Some(best)
    }
}

fn round_watts(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
