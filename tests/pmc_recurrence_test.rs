// ABOUTME: Integration tests for the PMC recurrence engine over the in-memory store
// ABOUTME: Seeding, idempotence, future-dated rows, and gap-filling projection

use chrono::{NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;
use velometrics::config::PmcConfig;
use velometrics::engine::pmc::{daily_recurrence, PmcEngine};
use velometrics::models::{ActivitySummary, DailyPerformanceMetric};
use velometrics::store::{InMemoryStore, PerformanceStore};

const CTL_TC: f64 = 42.0;
const ATL_TC: f64 = 7.0;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn activity_on(athlete_id: Uuid, day: NaiveDate, load: u32, intensity: f64) -> ActivitySummary {
    let start = Utc
        .from_utc_datetime(&day.and_hms_opt(8, 0, 0).unwrap());
    let mut summary = ActivitySummary::new(athlete_id, start, 3600);
    summary.unified_training_load = load;
    summary.intensity_factor = intensity;
    summary
}

fn stored_metric(athlete_id: Uuid, day: NaiveDate, ctl: f64, atl: f64) -> DailyPerformanceMetric {
    DailyPerformanceMetric {
        athlete_id,
        date: day,
        ctl,
        atl,
        tsb: ctl - atl,
        tss: 0,
        if_avg: 0.0,
    }
}

// --- Recurrence step ---

#[test]
fn test_recurrence_from_zero_state() {
    let pmc = daily_recurrence(0.0, 0.0, 100.0, &PmcConfig::default());
    assert!((pmc.ctl - 100.0 / CTL_TC).abs() < 1e-9);
    assert!((pmc.atl - 100.0 / ATL_TC).abs() < 1e-9);
    assert!((pmc.tsb - (pmc.ctl - pmc.atl)).abs() < 1e-9);
}

#[test]
fn test_recurrence_ongoing_training() {
    let pmc = daily_recurrence(50.0, 70.0, 80.0, &PmcConfig::default());
    assert!((pmc.ctl - (50.0 + (80.0 - 50.0) / CTL_TC)).abs() < 1e-9);
    assert!((pmc.atl - (70.0 + (80.0 - 70.0) / ATL_TC)).abs() < 1e-9);
    assert!((pmc.tsb - (pmc.ctl - pmc.atl)).abs() < 1e-9);
}

#[test]
fn test_recurrence_rest_day() {
    let pmc = daily_recurrence(50.0, 70.0, 0.0, &PmcConfig::default());
    assert!((pmc.ctl - (50.0 - 50.0 / CTL_TC)).abs() < 1e-9);
    assert!((pmc.atl - (70.0 - 70.0 / ATL_TC)).abs() < 1e-9);
}

// --- Recalculation ---

#[tokio::test]
async fn test_recalculate_with_no_previous_metrics_seeds_zero() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    let start = date(2023, 1, 1);
    let today = date(2023, 1, 3);

    store
        .upsert_activity(&activity_on(athlete_id, start, 10, 0.5))
        .await
        .unwrap();
    store
        .upsert_activity(&activity_on(athlete_id, date(2023, 1, 2), 20, 0.6))
        .await
        .unwrap();

    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    engine
        .recalculate_as_of(athlete_id, start, today)
        .await
        .unwrap();

    let rows = store
        .daily_metrics_in_range(athlete_id, start, today)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].date, start);
    assert_eq!(rows[0].tss, 10);
    assert!((rows[0].ctl - 10.0 / CTL_TC).abs() < 1e-9);
    assert!((rows[0].atl - 10.0 / ATL_TC).abs() < 1e-9);
    assert!((rows[0].if_avg - 0.5).abs() < 1e-9);

    // Day three has no activities and decays toward zero.
    assert_eq!(rows[2].tss, 0);
    assert!(rows[2].ctl < rows[1].ctl);
}

#[tokio::test]
async fn test_recalculate_seeds_from_last_metric_before_start() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    store
        .upsert_daily_metric(&stored_metric(athlete_id, date(2023, 1, 4), 40.0, 60.0))
        .await
        .unwrap();
    store
        .upsert_activity(&activity_on(athlete_id, date(2023, 1, 5), 50, 0.7))
        .await
        .unwrap();
    store
        .upsert_activity(&activity_on(athlete_id, date(2023, 1, 6), 10, 0.4))
        .await
        .unwrap();

    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    engine
        .recalculate_as_of(athlete_id, date(2023, 1, 5), date(2023, 1, 6))
        .await
        .unwrap();

    let rows = store
        .daily_metrics_in_range(athlete_id, date(2023, 1, 5), date(2023, 1, 6))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!((rows[0].ctl - (40.0 + (50.0 - 40.0) / CTL_TC)).abs() < 1e-9);
    assert!((rows[0].atl - (60.0 + (50.0 - 60.0) / ATL_TC)).abs() < 1e-9);
    assert_eq!(rows[0].tss, 50);
}

#[tokio::test]
async fn test_recalculate_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    let start = date(2023, 3, 1);
    let today = date(2023, 3, 10);
    for offset in [0, 2, 5] {
        let day = start + chrono::Duration::days(offset);
        store
            .upsert_activity(&activity_on(athlete_id, day, 60, 0.8))
            .await
            .unwrap();
    }

    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    engine
        .recalculate_as_of(athlete_id, start, today)
        .await
        .unwrap();
    let first = store
        .daily_metrics_in_range(athlete_id, start, today)
        .await
        .unwrap();

    engine
        .recalculate_as_of(athlete_id, start, today)
        .await
        .unwrap();
    let second = store
        .daily_metrics_in_range(athlete_id, start, today)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 10);
}

#[tokio::test]
async fn test_recalculate_extends_through_future_dated_rows() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    let today = date(2023, 6, 15);
    let future = date(2023, 6, 20);
    store
        .upsert_daily_metric(&stored_metric(athlete_id, future, 30.0, 30.0))
        .await
        .unwrap();

    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    engine
        .recalculate_as_of(athlete_id, date(2023, 6, 14), today)
        .await
        .unwrap();

    // The future-dated row is re-derived, not truncated.
    let rows = store
        .daily_metrics_in_range(athlete_id, date(2023, 6, 14), future)
        .await
        .unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows.last().unwrap().date, future);
}

#[tokio::test]
async fn test_recalculate_on_empty_store_covers_through_today() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    engine
        .recalculate_as_of(athlete_id, date(2023, 9, 1), date(2023, 9, 5))
        .await
        .unwrap();

    let rows = store
        .daily_metrics_in_range(athlete_id, date(2023, 9, 1), date(2023, 9, 5))
        .await
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| row.ctl.abs() < f64::EPSILON));
}

// --- Projection ---

#[tokio::test]
async fn test_projection_fills_gaps_without_writing() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    store
        .upsert_daily_metric(&stored_metric(athlete_id, date(2023, 2, 1), 42.0, 21.0))
        .await
        .unwrap();
    let persisted_before = store.daily_metric_count();

    let engine = PmcEngine::new(store.clone(), PmcConfig::default());
    let views = engine
        .project_range(athlete_id, date(2023, 2, 1), date(2023, 2, 4))
        .await
        .unwrap();

    assert_eq!(views.len(), 4);
    assert!(!views[0].projected);
    assert!(views[1].projected);

    // Gap days decay exactly as the recurrence with zero load.
    let expected = daily_recurrence(42.0, 21.0, 0.0, &PmcConfig::default());
    assert!((views[1].ctl - expected.ctl).abs() < 1e-9);
    assert!((views[1].atl - expected.atl).abs() < 1e-9);

    // The read path never persists anything.
    assert_eq!(store.daily_metric_count(), persisted_before);
}

#[tokio::test]
async fn test_projection_rejects_reversed_range() {
    let store = Arc::new(InMemoryStore::new());
    let engine = PmcEngine::new(store, PmcConfig::default());
    let result = engine
        .project_range(Uuid::new_v4(), date(2023, 2, 4), date(2023, 2, 1))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_projection_resumes_chain_after_persisted_row() {
    let store = Arc::new(InMemoryStore::new());
    let athlete_id = Uuid::new_v4();
    store
        .upsert_daily_metric(&stored_metric(athlete_id, date(2023, 2, 2), 50.0, 40.0))
        .await
        .unwrap();

    let engine = PmcEngine::new(store, PmcConfig::default());
    let views = engine
        .project_range(athlete_id, date(2023, 2, 1), date(2023, 2, 3))
        .await
        .unwrap();

    // Day one projects from zero state, day two is the stored row, and day
    // three decays from the stored row's state.
    assert!(views[0].projected);
    assert!(!views[1].projected);
    assert!(views[2].projected);
    let expected = daily_recurrence(50.0, 40.0, 0.0, &PmcConfig::default());
    assert!((views[2].ctl - expected.ctl).abs() < 1e-9);
}
