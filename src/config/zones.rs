// ABOUTME: Canonical zone band definitions and TRIMP weighting configuration
// ABOUTME: Fixed percent-of-threshold bands for power and heart-rate classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Zone band configuration.
//!
//! Band fractions and labels are fixed configuration constants used
//! system-wide; classification never re-derives them from a threshold.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use velometrics_core::errors::{AppError, AppResult};

/// Canonical power band fractions (Coggan), exclusive upper bounds as % of FTP
const POWER_BANDS: [(&str, f64); 7] = [
    ("Zone 1: Active Recovery", 0.55),
    ("Zone 2: Endurance", 0.76),
    ("Zone 3: Tempo", 0.91),
    ("Zone 4: Threshold", 1.06),
    ("Zone 5: VO2 Max", 1.21),
    ("Zone 6: Anaerobic", 1.51),
    ("Zone 7: Neuromuscular", f64::INFINITY),
];

/// Canonical heart-rate band fractions, exclusive upper bounds as % of LTHR
const HEART_RATE_BANDS: [(&str, f64); 6] = [
    ("Zone 1: Recovery", 0.85),
    ("Zone 2: Aerobic", 0.90),
    ("Zone 3: Tempo", 0.94),
    ("Zone 4: Sub-Threshold", 1.00),
    ("Zone 5: Super-Threshold (VO2 Max)", 1.06),
    ("Zone 6: Anaerobic Capacity", f64::INFINITY),
];

/// Per-zone multipliers for the zone-based TRIMP score, 1..6 across the HR zones
const TRIMP_ZONE_WEIGHTS: [(&str, f64); 6] = [
    ("Zone 1: Recovery", 1.0),
    ("Zone 2: Aerobic", 2.0),
    ("Zone 3: Tempo", 3.0),
    ("Zone 4: Sub-Threshold", 4.0),
    ("Zone 5: Super-Threshold (VO2 Max)", 5.0),
    ("Zone 6: Anaerobic Capacity", 6.0),
];

/// A single classification band
///
/// A sample belongs to the first band (in declared order) whose `upper_bound`
/// strictly exceeds the sample's percent-of-threshold ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneBand {
    /// Display label, stable across the system
    pub label: String,
    /// Exclusive upper bound as a fraction of the threshold
    pub upper_bound: f64,
}

/// An ordered set of non-overlapping zone bands
///
/// The final band is always unbounded (`f64::INFINITY`) so every finite
/// sample falls into exactly one band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneBands {
    bands: Vec<ZoneBand>,
}

impl ZoneBands {
    /// Build a band set from explicit bands, validating the ordering invariants
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the set is empty, the bounds are not
    /// strictly ascending, or the final band is not unbounded.
    pub fn new(bands: Vec<ZoneBand>) -> AppResult<Self> {
        if bands.is_empty() {
            return Err(AppError::config("zone band set must not be empty"));
        }
        for pair in bands.windows(2) {
            if pair[1].upper_bound <= pair[0].upper_bound {
                return Err(AppError::config(format!(
                    "zone band bounds must be strictly ascending: '{}' does not exceed '{}'",
                    pair[1].label, pair[0].label
                )));
            }
        }
        // The catch-all band keeps classification total over any finite sample.
        if let Some(last) = bands.last() {
            if last.upper_bound.is_finite() {
                return Err(AppError::config(format!(
                    "final zone band '{}' must be unbounded",
                    last.label
                )));
            }
        }
        Ok(Self { bands })
    }

    /// The canonical 7-band power set (percent of FTP)
    #[must_use]
    pub fn coggan_power() -> Self {
        Self::from_table(&POWER_BANDS)
    }

    /// The canonical 6-band heart-rate set (percent of LTHR)
    #[must_use]
    pub fn heart_rate() -> Self {
        Self::from_table(&HEART_RATE_BANDS)
    }

    fn from_table(table: &[(&str, f64)]) -> Self {
        Self {
            bands: table
                .iter()
                .map(|&(label, upper_bound)| ZoneBand {
                    label: label.into(),
                    upper_bound,
                })
                .collect(),
        }
    }

    /// Bands in declared classification order
    #[must_use]
    pub fn bands(&self) -> &[ZoneBand] {
        &self.bands
    }

    /// Number of bands in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether the set has no bands (never true for the canonical sets)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Per-zone weighting used by the zone-based TRIMP score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimpWeights {
    weights: HashMap<String, f64>,
}

impl Default for TrimpWeights {
    fn default() -> Self {
        Self {
            weights: TRIMP_ZONE_WEIGHTS
                .iter()
                .map(|&(label, weight)| (label.into(), weight))
                .collect(),
        }
    }
}

impl TrimpWeights {
    /// Weight for a zone label; unknown labels contribute nothing
    #[must_use]
    pub fn weight(&self, label: &str) -> f64 {
        self.weights.get(label).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sets_are_well_formed() {
        assert_eq!(ZoneBands::coggan_power().len(), 7);
        assert_eq!(ZoneBands::heart_rate().len(), 6);
        assert!(ZoneBands::coggan_power()
            .bands()
            .last()
            .is_some_and(|b| b.upper_bound.is_infinite()));
    }

    #[test]
    fn test_new_rejects_unordered_bands() {
        let bands = vec![
            ZoneBand {
                label: "low".into(),
                upper_bound: 0.9,
            },
            ZoneBand {
                label: "lower".into(),
                upper_bound: 0.5,
            },
        ];
        assert!(ZoneBands::new(bands).is_err());
    }

    #[test]
    fn test_new_rejects_bounded_final_band() {
        let bands = vec![ZoneBand {
            label: "only".into(),
            upper_bound: 1.0,
        }];
        assert!(ZoneBands::new(bands).is_err());
    }

    #[test]
    fn test_unknown_trimp_label_weighs_zero() {
        let weights = TrimpWeights::default();
        assert!((weights.weight("Zone 2: Aerobic") - 2.0).abs() < f64::EPSILON);
        assert!(weights.weight("Unknown Zone").abs() < f64::EPSILON);
    }
}
