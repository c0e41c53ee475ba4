use chrono::{TimeZone, Utc};
use mastery_core::{
    Aspect, Clock, InMemoryUserRepository, ManualClock, NewTask, SigilEvolution, SigilLevel,
    StateStore, StoreConfig,
};

fn new_store() -> (StateStore<InMemoryUserRepository, ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 15, 21, 0, 0).unwrap());
    let store = StateStore::new(
        InMemoryUserRepository::new(),
        clock.clone(),
        StoreConfig::default(),
    )
    .unwrap();
    (store, clock)
}

fn evolution(clock: &ManualClock, aspect: Aspect, change: i32) -> SigilEvolution {
    SigilEvolution {
        aspect,
        change,
        reason: "manual adjustment".to_string(),
        timestamp: clock.now(),
    }
}

#[test]
fn aspects_never_go_negative() {
    let (mut store, clock) = new_store();

    store.evolve_sigil(evolution(&clock, Aspect::Spiritual, 2));
    store.evolve_sigil(evolution(&clock, Aspect::Spiritual, -5));

    let sigil = &store.user().sigil;
    assert_eq!(sigil.aspects.spiritual, 0);
    assert_eq!(sigil.evolution_history.len(), 2);
    assert_eq!(store.user().stats.sigil_evolution_count, 2);
}

#[test]
fn evolve_sigil_is_recorded_in_todays_ledger() {
    let (mut store, clock) = new_store();

    store.evolve_sigil(evolution(&clock, Aspect::Creativity, 4));

    let today = store.get_today_progress().unwrap();
    assert_eq!(today.sigil_changes.len(), 1);
    assert_eq!(today.sigil_changes[0].aspect, Aspect::Creativity);
    assert_eq!(store.user().sigil.aspects.creativity, 4);
}

#[test]
fn design_token_tracks_aspect_total() {
    let (mut store, clock) = new_store();
    assert_eq!(store.generate_sigil_design(), "sigil-0");

    store.evolve_sigil(evolution(&clock, Aspect::Knowledge, 5));
    assert_eq!(store.generate_sigil_design(), "sigil-5");

    store.evolve_sigil(evolution(&clock, Aspect::Physical, 45));
    assert_eq!(store.generate_sigil_design(), "sigil-10");
}

#[test]
fn generating_a_design_does_not_store_it() {
    let (mut store, clock) = new_store();
    store.evolve_sigil(evolution(&clock, Aspect::Knowledge, 3));
    let before = store.snapshot();

    let token = store.generate_sigil_design();

    assert_eq!(*store.snapshot(), *before);
    assert!(store.apply_sigil_design(token.clone()));
    assert_eq!(store.user().sigil.current_design, token);
    assert!(!store.apply_sigil_design(token));
}

#[test]
fn evolution_leaves_level_until_synced() {
    let (mut store, clock) = new_store();

    store.evolve_sigil(evolution(&clock, Aspect::Discipline, 30));
    assert_eq!(store.user().sigil.level, SigilLevel::Novice);

    assert_eq!(store.sync_sigil_level(), SigilLevel::Adept);
    assert_eq!(store.user().sigil.level, SigilLevel::Adept);

    store.evolve_sigil(evolution(&clock, Aspect::Discipline, 20));
    assert_eq!(store.sync_sigil_level(), SigilLevel::Master);
    assert!(store
        .user()
        .achievements
        .iter()
        .any(|achievement| achievement.id == "sigil_master"));
}

#[test]
fn task_completion_grants_one_discipline_point() {
    let (mut store, _clock) = new_store();

    for n in 0..3 {
        let id = store.add_task(NewTask::one_off(format!("rep {n}"))).unwrap();
        store.complete_task(id);
    }

    let aspects = &store.user().sigil.aspects;
    assert_eq!(aspects.discipline, 3);
    assert_eq!(aspects.total(), 3);
}
