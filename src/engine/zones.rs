// ABOUTME: Time-in-zone classification of per-second streams against a threshold
// ABOUTME: Ordered percent-of-threshold bands accumulated into a ZoneDistribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Zone classification.

use serde::{Deserialize, Serialize};

use crate::config::zones::ZoneBands;

/// Cumulative seconds per zone, in band declaration order
///
/// Every non-null sample of the classified stream lands in exactly one
/// bucket, so the total never exceeds the stream length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneDistribution {
    buckets: Vec<(String, u64)>,
}

impl ZoneDistribution {
    /// An all-zero distribution over the given band set
    #[must_use]
    pub fn zeroed(bands: &ZoneBands) -> Self {
        Self {
            buckets: bands
                .bands()
                .iter()
                .map(|band| (band.label.clone(), 0))
                .collect(),
        }
    }

    /// Build a distribution from explicit (label, seconds) pairs
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, u64)>) -> Self {
        Self { buckets: pairs }
    }

    /// Seconds accumulated in the bucket with this label, 0 if absent
    #[must_use]
    pub fn seconds(&self, label: &str) -> u64 {
        self.buckets
            .iter()
            .find(|(bucket, _)| bucket == label)
            .map_or(0, |&(_, seconds)| seconds)
    }

    /// Sum of all bucket seconds
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.buckets.iter().map(|&(_, seconds)| seconds).sum()
    }

    /// Iterate buckets in band declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets
            .iter()
            .map(|(label, seconds)| (label.as_str(), *seconds))
    }

    /// Number of buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the distribution has no buckets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Total seconds spent in each physiological zone
///
/// Each non-null sample is assigned to the first band (in declared order)
/// whose upper bound strictly exceeds `sample / threshold`; null samples are
/// skipped entirely. A missing or non-positive threshold, or an empty stream,
/// yields every band mapped to 0 rather than an error — an athlete may simply
/// have no threshold established yet.
#[must_use]
pub fn time_in_zones(series: &[Option<f64>], threshold: f64, bands: &ZoneBands) -> ZoneDistribution {
    let mut distribution = ZoneDistribution::zeroed(bands);
    if threshold <= 0.0 || threshold.is_nan() || series.is_empty() {
        return distribution;
    }

    for value in series.iter().flatten() {
        let ratio = value / threshold;
        for (index, band) in bands.bands().iter().enumerate() {
            if ratio < band.upper_bound {
                distribution.buckets[index].1 += 1;
                break;
            }
        }
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_non_null_sample_lands_in_one_bucket() {
        let series: Vec<Option<f64>> = (0..200).map(|i| Some(f64::from(i) * 2.0)).collect();
        let distribution = time_in_zones(&series, 250.0, &ZoneBands::coggan_power());
        assert_eq!(distribution.total_seconds(), 200);
    }

    #[test]
    fn test_boundary_sample_goes_to_the_higher_band() {
        // Exactly 55% of threshold is not strictly below the Zone 1 bound.
        let series = vec![Some(55.0)];
        let distribution = time_in_zones(&series, 100.0, &ZoneBands::coggan_power());
        assert_eq!(distribution.seconds("Zone 1: Active Recovery"), 0);
        assert_eq!(distribution.seconds("Zone 2: Endurance"), 1);
    }

    #[test]
    fn test_nan_threshold_behaves_like_missing() {
        let series = vec![Some(100.0), Some(200.0)];
        let distribution = time_in_zones(&series, f64::NAN, &ZoneBands::coggan_power());
        assert_eq!(distribution.total_seconds(), 0);
        assert_eq!(distribution.len(), 7);
    }
}
