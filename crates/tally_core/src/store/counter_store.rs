//! In-memory counter state container.
//!
//! # Responsibility
//! - Own the ordered counter collection, the active selection and settings.
//! - Apply synchronous, total mutations; never fail and never do I/O.
//!
//! # Invariants
//! - Counters keep insertion order; deletion reassignment relies on it.
//! - Unknown ids and a missing active counter are silent no-ops.
//! - `reset_count` zeroes `count` only.
//! - Cap, name length and goal range are not checked here (see
//!   `service::counter_service`).

use crate::model::counter::{Counter, CounterDraft, CounterId, CounterUpdate};
use crate::model::settings::{AppSettings, SettingsUpdate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Owned, read-only copy of the whole store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub counters: Vec<Counter>,
    pub active_counter_id: Option<CounterId>,
    pub settings: AppSettings,
}

/// Single source of truth for counters, active selection and settings.
#[derive(Debug, Clone)]
pub struct CounterStore {
    counters: Vec<Counter>,
    active_counter_id: Option<CounterId>,
    settings: AppSettings,
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStore {
    /// Creates a store holding the seed counter, selected, and default settings.
    pub fn new() -> Self {
        let seed = Counter::seed();
        Self {
            active_counter_id: Some(seed.id.clone()),
            counters: vec![seed],
            settings: AppSettings::default(),
        }
    }

    /// Creates a store with no counters and no active selection.
    pub fn empty() -> Self {
        Self {
            counters: Vec::new(),
            active_counter_id: None,
            settings: AppSettings::default(),
        }
    }

    /// Appends a new counter and makes it active.
    ///
    /// # Contract
    /// - The returned id is freshly generated and distinct from existing ids.
    /// - Does not enforce the counter cap or name rules.
    pub fn add_counter(&mut self, draft: CounterDraft) -> CounterId {
        let mut counter = Counter::from_draft(draft);
        while self.counter(&counter.id).is_some() {
            counter.id = CounterId::generate();
        }
        let id = counter.id.clone();
        self.counters.push(counter);
        self.active_counter_id = Some(id.clone());
        debug!(
            "event=counter_add module=store status=ok counters={}",
            self.counters.len()
        );
        id
    }

    /// Replaces the fields set in `update` on the matching counter.
    ///
    /// Returns whether a counter matched; an unknown id changes nothing.
    pub fn update_counter(&mut self, id: &CounterId, update: CounterUpdate) -> bool {
        match self.counters.iter_mut().find(|counter| &counter.id == id) {
            Some(counter) => {
                counter.apply(update);
                debug!("event=counter_update module=store status=ok");
                true
            }
            None => {
                debug!("event=counter_update module=store status=noop reason=unknown_id");
                false
            }
        }
    }

    /// Removes the matching counter.
    ///
    /// When the active counter is removed, the first remaining counter becomes
    /// active, or the selection is cleared if none remain.
    pub fn delete_counter(&mut self, id: &CounterId) {
        let before = self.counters.len();
        self.counters.retain(|counter| &counter.id != id);
        if self.counters.len() == before {
            debug!("event=counter_delete module=store status=noop reason=unknown_id");
            return;
        }

        if self.active_counter_id.as_ref() == Some(id) {
            self.active_counter_id = self.counters.first().map(|counter| counter.id.clone());
        }
        debug!(
            "event=counter_delete module=store status=ok counters={} active={}",
            self.counters.len(),
            self.active_counter_id.is_some()
        );
    }

    /// Sets the active selection without checking that `id` exists.
    pub fn set_active_counter(&mut self, id: CounterId) {
        self.active_counter_id = Some(id);
    }

    /// Clears the active selection, leaving the explicit empty state that
    /// deleting the last counter also produces. Counters are untouched.
    pub fn clear_active_counter(&mut self) {
        self.active_counter_id = None;
        debug!("event=counter_select module=store status=ok active=false");
    }

    pub fn increment_count(&mut self) {
        if let Some(counter) = self.active_counter_mut() {
            counter.increment();
        }
    }

    pub fn decrement_count(&mut self) {
        if let Some(counter) = self.active_counter_mut() {
            counter.decrement();
        }
    }

    /// Sets `count` to zero on the active counter.
    ///
    /// `daily_count` and `lifetime_count` are left unchanged.
    pub fn reset_count(&mut self) {
        if let Some(counter) = self.active_counter_mut() {
            counter.reset();
            debug!("event=count_reset module=store status=ok");
        }
    }

    /// Merges `update` into settings field by field.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
        debug!("event=settings_update module=store status=ok");
    }

    /// All counters in insertion order.
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn counter(&self, id: &CounterId) -> Option<&Counter> {
        self.counters.iter().find(|counter| &counter.id == id)
    }

    /// The raw active selection, which may refer to a missing counter.
    pub fn active_counter_id(&self) -> Option<&CounterId> {
        self.active_counter_id.as_ref()
    }

    /// The active counter, or `None` when nothing valid is selected.
    pub fn active_counter(&self) -> Option<&Counter> {
        self.active_counter_id
            .as_ref()
            .and_then(|id| self.counter(id))
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            counters: self.counters.clone(),
            active_counter_id: self.active_counter_id.clone(),
            settings: self.settings.clone(),
        }
    }

    fn active_counter_mut(&mut self) -> Option<&mut Counter> {
        let id = self.active_counter_id.as_ref()?;
        self.counters.iter_mut().find(|counter| &counter.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::CounterStore;
    use crate::model::counter::{CounterDraft, CounterId, SEED_COUNTER_ID};

    #[test]
    fn new_store_selects_seed_counter() {
        let store = CounterStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.active_counter_id(),
            Some(&CounterId::from(SEED_COUNTER_ID))
        );
        assert_eq!(store.active_counter().map(|c| c.goal), Some(108));
    }

    #[test]
    fn dangling_selection_behaves_like_no_selection() {
        let mut store = CounterStore::new();
        store.set_active_counter(CounterId::from("missing"));
        store.increment_count();
        assert!(store.active_counter().is_none());
        assert_eq!(store.counters()[0].count, 0);
    }

    #[test]
    fn deleting_non_active_counter_keeps_selection() {
        let mut store = CounterStore::new();
        let added = store.add_counter(CounterDraft::new("b", 3, "#4CAF50"));
        store.delete_counter(&CounterId::from(SEED_COUNTER_ID));
        assert_eq!(store.active_counter_id(), Some(&added));
    }
}
