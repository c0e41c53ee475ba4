use chrono::{Duration, NaiveDate, TimeZone, Utc};
use mastery_core::{
    DailyProgressPatch, InMemoryUserRepository, ManualClock, NewTask, StateStore, StoreConfig,
};

fn new_store() -> (StateStore<InMemoryUserRepository, ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 10, 7, 0, 0).unwrap());
    let store = StateStore::new(
        InMemoryUserRepository::new(),
        clock.clone(),
        StoreConfig::default(),
    )
    .unwrap();
    (store, clock)
}

#[test]
fn first_record_creates_entry_with_defaults() {
    let (mut store, _clock) = new_store();
    assert!(store.get_today_progress().is_none());

    store.record_daily_progress(DailyProgressPatch {
        notes: Some(Some("slept well".to_string())),
        ..DailyProgressPatch::default()
    });

    let entry = store.get_today_progress().unwrap();
    assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 10, 10).unwrap());
    assert_eq!(entry.energy_level, 5);
    assert_eq!(entry.deep_work_minutes, 0);
    assert!(entry.tasks_completed.is_empty());
    assert_eq!(entry.notes.as_deref(), Some("slept well"));
}

#[test]
fn second_record_on_same_day_merges() {
    let (mut store, _clock) = new_store();

    store.record_daily_progress(DailyProgressPatch {
        energy_level: Some(8),
        deep_work_minutes: Some(45),
        ..DailyProgressPatch::default()
    });
    store.record_daily_progress(DailyProgressPatch {
        energy_level: Some(3),
        notes: Some(Some("afternoon slump".to_string())),
        ..DailyProgressPatch::default()
    });

    let user = store.user();
    assert_eq!(user.daily_progress.len(), 1);
    let entry = &user.daily_progress[0];
    assert_eq!(entry.energy_level, 3);
    assert_eq!(entry.deep_work_minutes, 45);
    assert_eq!(entry.notes.as_deref(), Some("afternoon slump"));
}

#[test]
fn new_day_gets_its_own_entry() {
    let (mut store, clock) = new_store();
    store.record_daily_progress(DailyProgressPatch::default());
    clock.advance(Duration::days(1));
    store.record_daily_progress(DailyProgressPatch {
        deep_work_minutes: Some(120),
        ..DailyProgressPatch::default()
    });

    assert_eq!(store.user().daily_progress.len(), 2);
    assert_eq!(store.get_today_progress().unwrap().deep_work_minutes, 120);
    assert!((store.user().stats.deep_work_hours - 2.0).abs() < f64::EPSILON);
}

#[test]
fn streaks_track_consecutive_completion_days() {
    let (mut store, clock) = new_store();

    for _ in 0..3 {
        let id = store.add_task(NewTask::one_off("Meditate")).unwrap();
        store.complete_task(id);
        clock.advance(Duration::days(1));
    }
    // Yesterday still counts toward the current run.
    store.update_stats();
    assert_eq!(store.user().stats.current_streak, 3);
    assert_eq!(store.user().stats.longest_streak, 3);

    clock.advance(Duration::days(2));
    store.update_stats();
    assert_eq!(store.user().stats.current_streak, 0);
    assert_eq!(store.user().stats.longest_streak, 3);
    assert!(store
        .user()
        .achievements
        .iter()
        .any(|achievement| achievement.id == "streak_3"));
}

#[test]
fn average_uses_trailing_window() {
    let (mut store, clock) = new_store();

    for _ in 0..2 {
        let id = store.add_task(NewTask::one_off("Old habit")).unwrap();
        store.complete_task(id);
    }
    clock.advance(Duration::days(10));
    let id = store.add_task(NewTask::one_off("New habit")).unwrap();
    store.complete_task(id);

    let stats = &store.user().stats;
    assert!((stats.average_daily_completion - 1.0).abs() < f64::EPSILON);
    assert_eq!(stats.total_tasks_completed, 3);
}

#[test]
fn update_stats_without_changes_is_a_noop() {
    let (mut store, _clock) = new_store();
    let id = store.add_task(NewTask::one_off("Tea")).unwrap();
    store.complete_task(id);
    let before = store.snapshot();

    assert!(!store.update_stats());
    assert_eq!(*store.snapshot(), *before);
}
