use std::collections::HashSet;
use tally_core::{
    CounterDraft, CounterId, CounterStore, CounterUpdate, GoalTracker, SettingsUpdate,
    ThemePreference, MAX_COUNT, SEED_COUNTER_ID,
};

fn store_with_single_counter(count: u32, goal: u32) -> (CounterStore, CounterId) {
    let mut store = CounterStore::empty();
    let id = store.add_counter(CounterDraft::new("Japa", goal, "#6B4BA6").with_count(count));
    (store, id)
}

fn active_counts(store: &CounterStore) -> (u32, u64, u64) {
    let counter = store.active_counter().expect("active counter");
    (counter.count, counter.daily_count, counter.lifetime_count)
}

#[test]
fn new_store_is_seeded() {
    let store = CounterStore::new();
    let seed = store.active_counter().expect("seed counter is active");

    assert_eq!(seed.id, CounterId::from(SEED_COUNTER_ID));
    assert_eq!(seed.name, "Daily Practice");
    assert_eq!(seed.count, 0);
    assert_eq!(seed.goal, 108);
    assert_eq!(seed.color, "#6B4BA6");
    assert_eq!(seed.daily_count, 0);
    assert_eq!(seed.lifetime_count, 0);
    assert_eq!(store.settings().default_goal, 108);
}

#[test]
fn increments_clamp_count_but_not_tallies() {
    let (mut store, _) = store_with_single_counter(9990, 108);
    for _ in 0..20 {
        store.increment_count();
    }
    assert_eq!(active_counts(&store), (MAX_COUNT, 20, 20));
}

#[test]
fn n_increments_from_any_start_give_clamped_sum() {
    for (start, n) in [(0_u32, 5_u32), (100, 0), (9998, 3), (MAX_COUNT, 1)] {
        let (mut store, _) = store_with_single_counter(start, 108);
        for _ in 0..n {
            store.increment_count();
        }
        assert_eq!(
            store.active_counter().expect("active").count,
            (start + n).min(MAX_COUNT),
            "start={start} n={n}"
        );
    }
}

#[test]
fn decrements_floor_each_field_independently() {
    let mut store = CounterStore::empty();
    store.add_counter(
        CounterDraft::new("Japa", 108, "#6B4BA6")
            .with_count(3)
            .with_daily_count(1)
            .with_lifetime_count(2),
    );

    for _ in 0..5 {
        store.decrement_count();
    }
    assert_eq!(active_counts(&store), (0, 0, 0));
}

#[test]
fn reset_leaves_daily_and_lifetime_untouched() {
    let (mut store, _) = store_with_single_counter(0, 3);
    let mut tracker = GoalTracker::new();
    let mut crossings = 0;

    for _ in 0..3 {
        store.increment_count();
        let counter = store.active_counter().expect("active");
        if tracker.observe(counter.count, counter.goal).is_reached() {
            crossings += 1;
        }
    }
    assert_eq!(active_counts(&store), (3, 3, 3));
    assert_eq!(crossings, 1);

    store.reset_count();
    assert_eq!(active_counts(&store), (0, 3, 3));
}

#[test]
fn count_operations_without_active_counter_are_noops() {
    let mut store = CounterStore::empty();
    store.increment_count();
    store.decrement_count();
    store.reset_count();
    assert!(store.is_empty());
    assert!(store.active_counter_id().is_none());

    let mut store = CounterStore::new();
    store.clear_active_counter();
    store.increment_count();
    assert_eq!(store.counters()[0].count, 0);
}

#[test]
fn add_counter_assigns_unique_id_and_selects_it() {
    let mut store = CounterStore::new();
    let mut seen = HashSet::new();
    seen.insert(CounterId::from(SEED_COUNTER_ID));

    for index in 0..5 {
        let id = store.add_counter(CounterDraft::new(format!("c{index}"), 108, "#2196F3"));
        assert!(seen.insert(id.clone()), "id must be fresh");
        assert_eq!(store.active_counter_id(), Some(&id));
    }
    assert_eq!(store.len(), 6);
}

#[test]
fn add_counter_keeps_insertion_order_and_defaults() {
    let mut store = CounterStore::new();
    let first = store.add_counter(CounterDraft::new("a", 216, "#D4A574"));
    let second = store.add_counter(CounterDraft::new("b", 432, "#4CAF50"));

    let ids = store
        .counters()
        .iter()
        .map(|counter| counter.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![CounterId::from(SEED_COUNTER_ID), first, second.clone()]);

    let added = store.counter(&second).expect("added counter");
    assert_eq!(added.daily_count, 0);
    assert_eq!(added.lifetime_count, 0);
    assert!(added.created_at > 0);
}

#[test]
fn store_does_not_enforce_counter_cap() {
    let mut store = CounterStore::empty();
    for index in 0..10 {
        store.add_counter(CounterDraft::new(format!("c{index}"), 108, "#6B4BA6"));
    }
    let eleventh = store.add_counter(CounterDraft::new("eleventh", 108, "#6B4BA6"));

    assert_eq!(store.len(), 11);
    assert_eq!(store.active_counter_id(), Some(&eleventh));
}

#[test]
fn update_counter_only_changes_named_fields() {
    let (mut store, id) = store_with_single_counter(7, 108);
    store.increment_count();
    let before = store.counter(&id).expect("counter").clone();

    assert!(store.update_counter(&id, CounterUpdate::new().goal(216)));

    let after = store.counter(&id).expect("counter");
    assert_eq!(after.goal, 216);
    assert_eq!(after.name, before.name);
    assert_eq!(after.count, before.count);
    assert_eq!(after.color, before.color);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.daily_count, before.daily_count);
    assert_eq!(after.lifetime_count, before.lifetime_count);
}

#[test]
fn update_counter_clamps_count_and_ignores_unknown_id() {
    let (mut store, id) = store_with_single_counter(0, 108);
    store.update_counter(&id, CounterUpdate::new().count(50_000).name("Renamed"));
    let counter = store.counter(&id).expect("counter");
    assert_eq!(counter.count, MAX_COUNT);
    assert_eq!(counter.name, "Renamed");

    let snapshot = store.snapshot();
    assert!(!store.update_counter(&CounterId::from("missing"), CounterUpdate::new().goal(1)));
    assert_eq!(store.snapshot(), snapshot);
}

#[test]
fn deleting_active_counter_selects_first_remaining() {
    let mut store = CounterStore::new();
    let second = store.add_counter(CounterDraft::new("b", 108, "#4CAF50"));
    let third = store.add_counter(CounterDraft::new("c", 108, "#2196F3"));

    store.delete_counter(&third);
    assert_eq!(
        store.active_counter_id(),
        Some(&CounterId::from(SEED_COUNTER_ID))
    );
    assert!(store.active_counter().is_some());

    store.set_active_counter(CounterId::from(SEED_COUNTER_ID));
    store.delete_counter(&CounterId::from(SEED_COUNTER_ID));
    assert_eq!(store.active_counter_id(), Some(&second));
}

#[test]
fn deleting_last_counter_clears_selection() {
    let mut store = CounterStore::new();
    store.delete_counter(&CounterId::from(SEED_COUNTER_ID));

    assert!(store.is_empty());
    assert!(store.active_counter_id().is_none());
    assert!(store.active_counter().is_none());
}

#[test]
fn deleting_unknown_counter_is_noop() {
    let mut store = CounterStore::new();
    store.delete_counter(&CounterId::from("missing"));
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.active_counter_id(),
        Some(&CounterId::from(SEED_COUNTER_ID))
    );
}

#[test]
fn set_active_counter_accepts_dangling_ids() {
    let mut store = CounterStore::new();
    store.set_active_counter(CounterId::from("ghost"));

    assert_eq!(store.active_counter_id(), Some(&CounterId::from("ghost")));
    assert!(store.active_counter().is_none());
}

#[test]
fn clear_active_counter_keeps_counters_until_reselected() {
    let (mut store, id) = store_with_single_counter(4, 10);
    store.clear_active_counter();

    assert!(store.active_counter_id().is_none());
    assert_eq!(store.len(), 1);
    store.decrement_count();
    assert_eq!(store.counter(&id).map(|counter| counter.count), Some(4));

    store.set_active_counter(id);
    store.increment_count();
    assert_eq!(active_counts(&store), (5, 1, 1));
}

#[test]
fn update_settings_merges_fields() {
    let mut store = CounterStore::new();
    store.update_settings(
        SettingsUpdate::new()
            .haptic_enabled(false)
            .theme(ThemePreference::Dark),
    );

    let settings = store.settings();
    assert!(!settings.haptic_enabled);
    assert_eq!(settings.theme, ThemePreference::Dark);
    assert_eq!(settings.display_name, "Practitioner");
    assert!(!settings.sound_enabled);
    assert_eq!(settings.default_goal, 108);
}
