// ABOUTME: Main library entry point for the velometrics training-load engine
// ABOUTME: Exposes the computation engine, configuration, and store abstraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

#![deny(unsafe_code)]

//! # Velometrics
//!
//! A training-load analytics engine for endurance athletes. It converts raw
//! per-second sensor streams (power, heart rate, speed) into normalized
//! power, Training Stress Score, TRIMP, zone distributions, mean-maximal-power
//! curves, and a day-by-day Performance Management Chart, and keeps
//! per-athlete calibration (personalized scaling factors, threshold markers)
//! up to date as activities are created, edited, and deleted.
//!
//! ## Architecture
//!
//! - **Engine** ([`engine`]): pure, total computations over numeric series
//!   plus the stateful PMC recurrence and PSF estimator.
//! - **Config** ([`config`]): zone band definitions, TRIMP weights, PMC time
//!   constants, and PSF defaults as explicit configuration values.
//! - **Store** ([`store`]): the persistence collaborator as an async trait,
//!   with a `DashMap`-backed in-memory implementation for tests and demos.
//! - **Core** (`velometrics-core`): domain value types and error handling.
//!
//! The engine performs no network or file I/O itself; all inputs are supplied
//! by the caller or fetched through the store trait.
//!
//! ## Example
//!
//! ```rust
//! use velometrics::config::zones::ZoneBands;
//! use velometrics::engine::{metrics, rolling, zones};
//!
//! let power: Vec<Option<f64>> = vec![Some(220.0); 3600];
//! let np = rolling::normalized_power(&power);
//! let tss = metrics::training_stress_score(f64::from(np), 250.0, 3600.0);
//! let in_zones = zones::time_in_zones(&power, 250.0, &ZoneBands::coggan_power());
//! assert_eq!(np, 220);
//! assert_eq!(tss, 77);
//! assert_eq!(in_zones.total_seconds(), 3600);
//! ```

/// Engine configuration: zone bands, TRIMP weights, PMC and PSF constants
pub mod config;

/// The training-load computation engine
pub mod engine;

/// Persistence collaborator trait and in-memory implementation
pub mod store;

pub use velometrics_core::errors;
pub use velometrics_core::models;
