//! Integration tests for workout history on a real SQLite store.
//!
//! Covers the full path from a running timer to persisted daily totals
//! and the derived streak and calendar views.

use chrono::{Days, NaiveDate};
use intervalo_core::history::{local_today, HISTORY_KEY};
use intervalo_core::{
    Database, Intensity, KvStore, MonthKey, MonthView, TimerConfig, TimerEngine, Trainer,
    WorkoutHistory,
};
use tempfile::TempDir;

#[test]
fn completed_sets_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = TimerConfig::new(2, 1, 2).unwrap();

    {
        let db = Database::open_in(temp_dir.path()).unwrap();
        let mut trainer = Trainer::restore(db, config);
        for _ in 0..2 {
            trainer.start();
            for _ in 0..config.ticks_per_set() {
                trainer.tick();
            }
        }
        trainer.persist_engine().unwrap();
        assert_eq!(trainer.history().today_stats().completed_sets, 2);
    }

    let db = Database::open_in(temp_dir.path()).unwrap();
    let trainer = Trainer::restore(db, TimerConfig::default());
    assert_eq!(trainer.history().today_stats().completed_sets, 2);
    assert_eq!(trainer.history().days().len(), 1);
    assert_eq!(trainer.engine().completed_sets(), 2);
    assert_eq!(trainer.engine().config(), &config);
}

#[test]
fn stored_format_is_date_keyed_json() {
    let mut db = Database::open_memory().unwrap();
    db.kv_set(
        HISTORY_KEY,
        r#"[{"date":"2026-02-27","completedSets":2},{"date":"2026-02-28","completedSets":1},{"date":"2026-03-01","completedSets":5}]"#,
    )
    .unwrap();

    let history = WorkoutHistory::load(db);
    let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(history.streak_as_of(today), 3);
    assert_eq!(history.stats_on(today).completed_sets, 5);
    assert_eq!(history.total_sets(), 8);
}

#[test]
fn corrupt_store_recovers_and_overwrites() {
    let mut db = Database::open_memory().unwrap();
    db.kv_set(HISTORY_KEY, "not json at all").unwrap();

    let mut history = WorkoutHistory::load(db);
    assert!(history.days().is_empty());

    history.record_completion(1);
    let json = history.store().kv_get(HISTORY_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["completedSets"], 1);
}

#[test]
fn month_view_over_recorded_history() {
    let db = Database::open_memory().unwrap();
    let mut history = WorkoutHistory::load(db);
    let today = local_today();
    for _ in 0..7 {
        history.record_completion_on(1, today);
    }
    if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
        history.record_completion_on(2, yesterday);
    }

    let view = MonthView::build(history.days(), MonthKey::containing(today));
    let cell = view.days.iter().find(|d| d.date == today).unwrap();
    assert_eq!(cell.completed_sets, 7);
    assert_eq!(cell.intensity, Intensity::Peak);
    assert_eq!(history.streak(), 2);
}

#[test]
fn fresh_engine_uses_fallback_config() {
    let db = Database::open_memory().unwrap();
    let trainer = Trainer::restore(db, TimerConfig::new(7, 3, 4).unwrap());
    assert_eq!(trainer.engine().time_left_secs(), 7);
    assert_eq!(trainer.engine().total_iterations(), 4);
    let engine = TimerEngine::new(TimerConfig::new(7, 3, 4).unwrap());
    assert_eq!(engine.state(), trainer.engine().state());
}
