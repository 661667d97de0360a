// ABOUTME: Tests for unified load resolution and PSF recalibration
// ABOUTME: Strict fallback chain plus confidence-weighted scaling factor updates

use chrono::{TimeZone, Utc};
use uuid::Uuid;
use velometrics::config::PsfConfig;
use velometrics::engine::load::{apply_load_resolution, resolve_unified_load};
use velometrics::engine::psf::update_scaling_factors;
use velometrics::errors::ErrorCode;
use velometrics::models::{ActivitySummary, AthleteProfile, ScalingFactors};
use velometrics::store::{InMemoryStore, PerformanceStore};

fn factors(trimp: f64, pss: f64) -> ScalingFactors {
    ScalingFactors { trimp, pss }
}

async fn seeded_athlete(store: &InMemoryStore) -> AthleteProfile {
    let athlete = AthleteProfile::new("Tester");
    store.create_athlete(&athlete).await.unwrap();
    athlete
}

fn dual_activity(athlete_id: Uuid, tss: u32, trimp: u32, pss: u32) -> ActivitySummary {
    let start = Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap();
    let mut summary = ActivitySummary::new(athlete_id, start, 3600);
    summary.tss = tss;
    summary.trimp = trimp;
    summary.perceived_strain_score = pss;
    summary
}

// --- Unified load resolution ---

#[test]
fn test_tss_always_wins() {
    assert_eq!(resolve_unified_load(95, 300, 400, &factors(0.42, 0.24)), 95);
}

#[test]
fn test_trimp_scaled_when_no_tss() {
    assert_eq!(resolve_unified_load(0, 200, 400, &factors(0.42, 0.24)), 84);
    // Rounding to nearest: 150 * 0.42 = 63.0
    assert_eq!(resolve_unified_load(0, 150, 0, &factors(0.42, 0.24)), 63);
}

#[test]
fn test_pss_scaled_when_no_tss_or_trimp() {
    assert_eq!(resolve_unified_load(0, 0, 400, &factors(0.42, 0.24)), 96);
}

#[test]
fn test_nothing_present_yields_zero() {
    assert_eq!(resolve_unified_load(0, 0, 0, &factors(0.42, 0.24)), 0);
}

#[test]
fn test_apply_load_resolution_rederives_pss_from_rpe() {
    let start = Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap();
    let mut summary = ActivitySummary::new(Uuid::new_v4(), start, 3600);
    summary.perceived_exertion = Some(7);
    apply_load_resolution(&mut summary, &ScalingFactors::default());

    assert_eq!(summary.perceived_strain_score, 420);
    // 420 * 0.24 rounds to 101.
    assert_eq!(summary.unified_training_load, 101);
}

#[test]
fn test_apply_load_resolution_prefers_existing_tss() {
    let start = Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap();
    let mut summary = ActivitySummary::new(Uuid::new_v4(), start, 3600);
    summary.tss = 88;
    summary.perceived_exertion = Some(7);
    apply_load_resolution(&mut summary, &ScalingFactors::default());
    assert_eq!(summary.unified_training_load, 88);
}

// --- PSF estimation ---

#[tokio::test]
async fn test_single_dual_activity_blends_at_one_fifth_weight() {
    let store = InMemoryStore::new();
    let athlete = seeded_athlete(&store).await;
    store
        .upsert_activity(&dual_activity(athlete.id, 100, 200, 0))
        .await
        .unwrap();

    let updated = update_scaling_factors(&store, athlete.id, &PsfConfig::default())
        .await
        .unwrap();

    // fitted 0.5, weight 0.2: 0.5 * 0.2 + 0.42 * 0.8
    assert!((updated.trimp - 0.436).abs() < 1e-9);
    // No PSS data: the PSS factor stays at its default.
    assert!((updated.pss - 0.24).abs() < 1e-9);

    let persisted = store.get_athlete(athlete.id).await.unwrap().unwrap();
    assert!((persisted.scaling_factors.trimp - 0.436).abs() < 1e-9);
}

#[tokio::test]
async fn test_full_confidence_uses_fitted_ratio() {
    let store = InMemoryStore::new();
    let athlete = seeded_athlete(&store).await;
    for _ in 0..6 {
        store
            .upsert_activity(&dual_activity(athlete.id, 90, 300, 0))
            .await
            .unwrap();
    }

    let updated = update_scaling_factors(&store, athlete.id, &PsfConfig::default())
        .await
        .unwrap();
    assert!((updated.trimp - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn test_pss_factor_fits_independently() {
    let store = InMemoryStore::new();
    let athlete = seeded_athlete(&store).await;
    store
        .upsert_activity(&dual_activity(athlete.id, 120, 0, 400))
        .await
        .unwrap();

    let updated = update_scaling_factors(&store, athlete.id, &PsfConfig::default())
        .await
        .unwrap();
    // fitted 0.3, weight 0.2: 0.3 * 0.2 + 0.24 * 0.8
    assert!((updated.pss - 0.252).abs() < 1e-9);
    assert!((updated.trimp - 0.42).abs() < 1e-9);
}

#[tokio::test]
async fn test_no_qualifying_activities_leaves_factors_unchanged() {
    let store = InMemoryStore::new();
    let mut athlete = AthleteProfile::new("Calibrated");
    athlete.scaling_factors = factors(0.5, 0.3);
    store.create_athlete(&athlete).await.unwrap();

    // TSS-only activity: no dual data, nothing to fit.
    store
        .upsert_activity(&dual_activity(athlete.id, 80, 0, 0))
        .await
        .unwrap();

    let updated = update_scaling_factors(&store, athlete.id, &PsfConfig::default())
        .await
        .unwrap();
    assert!((updated.trimp - 0.5).abs() < 1e-9);
    assert!((updated.pss - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_athlete_is_not_found() {
    let store = InMemoryStore::new();
    let err = update_scaling_factors(&store, Uuid::new_v4(), &PsfConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
