//! Core domain logic for the tally counter app.
//! This crate is the single source of truth for counter invariants.

pub mod feedback;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use feedback::{
    fire_and_forget, FeedbackCapability, FeedbackError, FeedbackSignal, ImpactStyle, NoopFeedback,
};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::counter::{
    Counter, CounterDraft, CounterId, CounterUpdate, DEFAULT_GOAL, DEFAULT_GOALS, MAX_COUNT,
    MAX_COUNTERS, MAX_GOAL, MAX_NAME_CHARS, MIN_GOAL, PRESET_COLORS, SEED_COUNTER_ID,
};
pub use model::settings::{
    AppSettings, Appearance, Avatar, SettingsUpdate, ThemePreference, MAX_DISPLAY_NAME_CHARS,
};
pub use service::counter_service::{CounterService, CounterServiceError, ServiceResult, TapOutcome};
pub use service::goal_tracker::{GoalEvent, GoalTracker};
pub use store::context::{StoreAccessError, StoreContext};
pub use store::counter_store::{CounterStore, StoreSnapshot};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
