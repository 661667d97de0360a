// ABOUTME: Main library entry point for the velometrics-core foundation crate
// ABOUTME: Exposes domain models, error types, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

#![deny(unsafe_code)]

//! # Velometrics Core
//!
//! Foundation crate for the velometrics training-load platform. It contains
//! the domain value types (activity summaries, threshold history, daily
//! performance metrics, performance markers), the unified error types, and
//! shared constants. The computation engine itself lives in the root
//! `velometrics` crate; everything here is plain data with no I/O.

/// Shared numeric constants
pub mod constants;

/// Unified error types and result alias
pub mod errors;

/// Domain value types
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
