//! Counter domain model.
//!
//! # Responsibility
//! - Define the tally record shown and mutated by the counting screen.
//! - Provide clamped count arithmetic and derived progress projections.
//!
//! # Invariants
//! - `id` is stable and never reused for another counter.
//! - `count` stays within `0..=MAX_COUNT`.
//! - `daily_count` and `lifetime_count` never go below zero.
//! - `created_at` is written once and never read by core logic.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Upper clamp for `Counter::count`.
pub const MAX_COUNT: u32 = 9999;
/// Maximum number of counters a user may create.
pub const MAX_COUNTERS: usize = 10;
/// Maximum counter name length in characters (after trimming).
pub const MAX_NAME_CHARS: usize = 20;
/// Smallest accepted goal.
pub const MIN_GOAL: u32 = 1;
/// Largest accepted goal.
pub const MAX_GOAL: u32 = 9999;
/// Goal used by the seed counter and default settings.
pub const DEFAULT_GOAL: u32 = 108;
/// Stable id of the counter every new store starts with.
pub const SEED_COUNTER_ID: &str = "1";
/// Display name of the seed counter.
pub const SEED_COUNTER_NAME: &str = "Daily Practice";

/// Accent colours offered by the colour picker. The first entry is the default.
pub const PRESET_COLORS: [&str; 8] = [
    "#6B4BA6", "#D4A574", "#4CAF50", "#2196F3", "#FF6B6B", "#9C27B0", "#FF9800", "#00BCD4",
];

/// Goal presets offered next to the custom goal input.
pub const DEFAULT_GOALS: [u32; 4] = [108, 216, 432, 1008];

/// Opaque, stable identifier of a counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterId(String);

impl CounterId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for CounterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CounterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for CounterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// One tally entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Assigned at creation, immutable.
    pub id: CounterId,
    /// Display label. Length rules are enforced by the creation service.
    pub name: String,
    /// Current tally, clamped to `0..=MAX_COUNT`.
    pub count: u32,
    /// Target; reaching or exceeding it signals completion.
    pub goal: u32,
    /// Opaque accent colour, never validated.
    pub color: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Increments applied "today". There is no day-boundary reset.
    #[serde(default)]
    pub daily_count: u64,
    /// Net increments since creation.
    #[serde(default)]
    pub lifetime_count: u64,
}

impl Counter {
    /// Builds a counter from a draft with a fresh id and the current time.
    pub fn from_draft(draft: CounterDraft) -> Self {
        Self::from_draft_with_id(CounterId::generate(), draft)
    }

    /// Builds a counter from a draft with a caller-provided id.
    ///
    /// # Invariants
    /// - `count` is clamped to `MAX_COUNT`.
    /// - Missing daily/lifetime counts start at zero.
    pub fn from_draft_with_id(id: CounterId, draft: CounterDraft) -> Self {
        Self {
            id,
            name: draft.name,
            count: draft.count.min(MAX_COUNT),
            goal: draft.goal,
            color: draft.color,
            created_at: now_epoch_ms(),
            daily_count: draft.daily_count.unwrap_or(0),
            lifetime_count: draft.lifetime_count.unwrap_or(0),
        }
    }

    /// The counter every new store is seeded with.
    pub fn seed() -> Self {
        Self::from_draft_with_id(
            CounterId::from(SEED_COUNTER_ID),
            CounterDraft::new(SEED_COUNTER_NAME, DEFAULT_GOAL, PRESET_COLORS[0]),
        )
    }

    pub(crate) fn increment(&mut self) {
        self.count = (self.count + 1).min(MAX_COUNT);
        self.daily_count = self.daily_count.saturating_add(1);
        self.lifetime_count = self.lifetime_count.saturating_add(1);
    }

    pub(crate) fn decrement(&mut self) {
        self.count = self.count.saturating_sub(1);
        self.daily_count = self.daily_count.saturating_sub(1);
        self.lifetime_count = self.lifetime_count.saturating_sub(1);
    }

    /// Zeroes `count` only; daily and lifetime tallies are kept.
    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }

    pub(crate) fn apply(&mut self, update: CounterUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(count) = update.count {
            self.count = count.min(MAX_COUNT);
        }
        if let Some(goal) = update.goal {
            self.goal = goal;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(daily_count) = update.daily_count {
            self.daily_count = daily_count;
        }
        if let Some(lifetime_count) = update.lifetime_count {
            self.lifetime_count = lifetime_count;
        }
    }

    /// Fraction of the goal reached, capped at `1.0`.
    ///
    /// Returns `0.0` for a zero goal instead of dividing by zero.
    pub fn progress(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (f64::from(self.count) / f64::from(self.goal)).min(1.0)
    }

    /// `progress()` as a rounded whole percentage (`0..=100`).
    pub fn progress_percent(&self) -> u8 {
        (self.progress() * 100.0).round() as u8
    }

    /// Whether `count` is at or above a positive goal.
    pub fn is_goal_reached(&self) -> bool {
        self.goal > 0 && self.count >= self.goal
    }
}

/// Input for creating a counter. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDraft {
    pub name: String,
    pub count: u32,
    pub goal: u32,
    pub color: String,
    pub daily_count: Option<u64>,
    pub lifetime_count: Option<u64>,
}

impl CounterDraft {
    /// Draft starting at zero with unset daily/lifetime tallies.
    pub fn new(name: impl Into<String>, goal: u32, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            goal,
            color: color.into(),
            daily_count: None,
            lifetime_count: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_daily_count(mut self, daily_count: u64) -> Self {
        self.daily_count = Some(daily_count);
        self
    }

    pub fn with_lifetime_count(mut self, lifetime_count: u64) -> Self {
        self.lifetime_count = Some(lifetime_count);
        self
    }
}

/// Field-level update for an existing counter.
///
/// Unset fields are left untouched. `id` and `created_at` are immutable and
/// therefore not part of the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterUpdate {
    pub name: Option<String>,
    pub count: Option<u32>,
    pub goal: Option<u32>,
    pub color: Option<String>,
    pub daily_count: Option<u64>,
    pub lifetime_count: Option<u64>,
}

impl CounterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn goal(mut self, goal: u32) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn daily_count(mut self, daily_count: u64) -> Self {
        self.daily_count = Some(daily_count);
        self
    }

    pub fn lifetime_count(mut self, lifetime_count: u64) -> Self {
        self.lifetime_count = Some(lifetime_count);
        self
    }

    /// Whether the descriptor carries no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
