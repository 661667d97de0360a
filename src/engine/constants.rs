// ABOUTME: Physiological and device model constants for the computation engine
// ABOUTME: Normalized-power window, marker detection factors, trainer power model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Named constants used by the engine.
//!
//! Values are fixed by the methodology they implement; tunables that vary per
//! deployment live in [`crate::config`] instead.

/// Power metric constants
pub mod power {
    /// Rolling window for normalized power (Coggan's 30-second smoothing)
    pub const NP_ROLLING_WINDOW_SECONDS: usize = 30;

    /// Window length used for automatic threshold detection
    pub const THRESHOLD_DETECTION_WINDOW_MINUTES: u32 = 20;

    /// Fraction of the best 20-minute power taken as estimated FTP
    pub const FTP_FROM_BEST_WINDOW_FACTOR: f64 = 0.95;

    /// Multiplier turning duration-weighted intensity into TSS points
    pub const TSS_BASE_MULTIPLIER: f64 = 100.0;
}

/// Linear power model for a fluid trainer (Tacx Blue Motion T2600)
///
/// The coefficient grows linearly with the resistance setting:
/// `a = BASE + (setting - 1) * STEP`, power = `a * speed_kmh`. The base is
/// 150 W at 60 km/h on setting 1; the step spreads the 950 W top setting
/// evenly across the remaining nine settings.
pub mod trainer {
    /// Coefficient at resistance setting 1
    pub const BASE_COEFFICIENT: f64 = 2.5;

    /// Coefficient increase per resistance setting step
    pub const COEFFICIENT_STEP: f64 = 1.4815;

    /// Lowest valid resistance setting
    pub const MIN_SETTING: u8 = 1;

    /// Highest valid resistance setting
    pub const MAX_SETTING: u8 = 10;
}
