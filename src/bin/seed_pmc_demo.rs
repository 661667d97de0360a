// ABOUTME: Demo seeder exercising the full training-load pipeline in memory
// ABOUTME: Generates synthetic activities, runs PSF and PMC, prints the resulting chart
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Velometrics

//! Demo data seeder for the velometrics engine.
//!
//! Populates an in-memory store with a deterministic block of synthetic
//! rides, runs the complete pipeline (zones, NP/TSS/TRIMP, unified load, PSF,
//! marker detection, PMC recalculation), and prints the resulting chart.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-pmc-demo
//! cargo run --bin seed-pmc-demo -- --days 90 --ftp 280 -v
//! ```

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;
use velometrics::config::EngineConfig;
use velometrics::engine::{load, pmc::PmcEngine, psf, ActivityAnalyzer};
use velometrics::models::{
    ActivitySummary, AthleteProfile, MetricType, ThresholdMetric, TimeSeriesData,
};
use velometrics::store::{InMemoryStore, PerformanceStore};

#[derive(Parser)]
#[command(
    name = "seed-pmc-demo",
    about = "Velometrics demo seeder",
    long_about = "Seed an in-memory store with synthetic activities and print the PMC"
)]
struct SeedArgs {
    /// Days of history to generate
    #[arg(long, default_value = "60")]
    days: u32,

    /// Athlete FTP in watts
    #[arg(long, default_value = "250")]
    ftp: f64,

    /// Athlete LTHR in beats per minute
    #[arg(long, default_value = "165")]
    lthr: f64,

    /// Seed for the synthetic data generator
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "velometrics=debug,seed_pmc_demo=debug"
        } else {
            "velometrics=info,seed_pmc_demo=info"
        })
        .init();

    let store = Arc::new(InMemoryStore::new());
    let config = EngineConfig::from_env();
    let analyzer = ActivityAnalyzer::new().with_thresholds(Some(args.ftp), Some(args.lthr));

    let athlete = AthleteProfile::new("Demo Athlete");
    store.create_athlete(&athlete).await?;

    let today = Utc::now().date_naive();
    let first_day = today - Duration::days(i64::from(args.days));
    for (metric_type, value) in [(MetricType::Ftp, args.ftp), (MetricType::Lthr, args.lthr)] {
        store
            .create_threshold(
                athlete.id,
                &ThresholdMetric {
                    metric_type,
                    value,
                    date_established: first_day,
                },
            )
            .await?;
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut ride_count = 0_u32;
    for offset in 0..args.days {
        // Roughly five rides a week.
        if rng.gen_range(0..7) >= 5 {
            continue;
        }
        let day = first_day + Duration::days(i64::from(offset));
        let start_time = Utc
            .from_utc_datetime(&day.and_hms_opt(7, 30, 0).unwrap_or_default());
        let duration_seconds = rng.gen_range(1800..7200_u32);
        let base_watts = args.ftp * rng.gen_range(0.6..0.95);
        let base_hr = args.lthr * rng.gen_range(0.75..1.0);

        let streams = TimeSeriesData {
            power: Some(
                (0..duration_seconds)
                    .map(|i| Some(base_watts + f64::from(i % 60) - 30.0))
                    .collect(),
            ),
            heart_rate: Some(
                (0..duration_seconds)
                    .map(|i| Some(base_hr + f64::from(i % 20) / 4.0))
                    .collect(),
            ),
            speed: None,
        };

        let analysis = analyzer.analyze(&streams, duration_seconds, athlete.id, start_time);
        let mut summary = ActivitySummary::new(athlete.id, start_time, duration_seconds);
        summary.normalized_power = Some(analysis.normalized_power);
        summary.average_power = Some(base_watts as u32);
        summary.max_power = Some((base_watts + 29.0) as u32);
        summary.tss = analysis.tss;
        summary.intensity_factor = analysis.intensity_factor;
        summary.trimp = analysis.trimp;
        load::apply_load_resolution(&mut summary, &athlete.scaling_factors);
        store.upsert_activity(&summary).await?;
        ride_count += 1;

        for marker in analysis.markers {
            store.create_marker(&marker).await?;
        }
    }
    info!(rides = ride_count, days = args.days, "seeded synthetic activities");

    let factors = psf::update_scaling_factors(store.as_ref(), athlete.id, &config.psf).await?;
    info!(psf_trimp = factors.trimp, psf_pss = factors.pss, "calibrated scaling factors");

    let engine = PmcEngine::new(store.clone(), config.pmc);
    engine.recalculate(athlete.id, first_day).await?;

    println!("date        ctl     atl     tsb     tss");
    for view in engine.project_range(athlete.id, first_day, today).await? {
        println!(
            "{}  {:6.1}  {:6.1}  {:6.1}  {:5}",
            view.date, view.ctl, view.atl, view.tsb, view.tss
        );
    }

    let pending = store.pending_markers(athlete.id).await?;
    if !pending.is_empty() {
        println!("\npending markers:");
        for marker in pending {
            println!(
                "  {:?} {:.0} detected {}",
                marker.metric_type,
                marker.value,
                marker.date_detected.date_naive()
            );
        }
    }
    Ok(())
}
