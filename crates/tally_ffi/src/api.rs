//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose counting-screen, counter editor and profile use-cases to Dart.
//! - Own the single process-wide counter service and its store lifetime.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call made outside `store_init`..`store_dispose` returns a failure
//!   envelope carrying the store-lifetime error.
//! - Feedback signals are returned to the host for playback; the core never
//!   waits on them.

use log::warn;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::sync::{Mutex, PoisonError};
use tally_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppSettings, Appearance, Avatar, Counter, CounterId, CounterService, FeedbackCapability,
    FeedbackError, FeedbackSignal, ServiceResult, SettingsUpdate, StoreContext, TapOutcome,
    ThemePreference,
};

static SERVICE: Lazy<Mutex<CounterService<SignalQueue>>> = Lazy::new(|| {
    Mutex::new(CounterService::with_context(
        StoreContext::new(),
        SignalQueue::default(),
    ))
});

/// Collects gated feedback signals until the host drains them.
#[derive(Default)]
struct SignalQueue {
    pending: RefCell<Vec<FeedbackSignal>>,
}

impl SignalQueue {
    fn drain(&self) -> Vec<String> {
        self.pending
            .borrow_mut()
            .drain(..)
            .map(|signal| signal.as_str().to_string())
            .collect()
    }
}

impl FeedbackCapability for SignalQueue {
    fn emit(&self, signal: FeedbackSignal) -> Result<(), FeedbackError> {
        self.pending.borrow_mut().push(signal);
        Ok(())
    }
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Counter row returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyCounterItem {
    pub counter_id: String,
    pub name: String,
    pub count: u32,
    pub goal: u32,
    pub color: String,
    pub created_at: i64,
    pub daily_count: u64,
    pub lifetime_count: u64,
    /// Rounded `0..=100` progress towards the goal.
    pub progress_percent: u8,
}

/// Settings as seen by the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallySettingsItem {
    pub display_name: String,
    /// `lotus|om|meditation`.
    pub avatar: String,
    pub haptic_enabled: bool,
    pub sound_enabled: bool,
    /// `light|dark|auto`.
    pub theme: String,
    pub default_goal: u32,
}

/// Full read model after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallySnapshotResponse {
    pub ok: bool,
    pub counters: Vec<TallyCounterItem>,
    /// `None` when nothing is selected or the selection is dangling.
    pub active_counter_id: Option<String>,
    pub settings: Option<TallySettingsItem>,
    pub goal_notice_pending: bool,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyActionResponse {
    pub ok: bool,
    /// Created counter ID, set by `counter_create` only.
    pub counter_id: Option<String>,
    pub message: String,
}

impl TallyActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            counter_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            counter_id: None,
            message: message.into(),
        }
    }
}

/// Result of tap, undo and reset on the active counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyCountResponse {
    pub ok: bool,
    pub count: u32,
    pub goal: u32,
    pub progress_percent: u8,
    /// Set only on the call that crossed the goal.
    pub goal_reached: bool,
    /// Signals the host should play (`impact_light|impact_medium|success`).
    pub feedback: Vec<String>,
    pub message: String,
}

impl TallyCountResponse {
    fn failure(message: impl Into<String>, feedback: Vec<String>) -> Self {
        Self {
            ok: false,
            count: 0,
            goal: 0,
            progress_percent: 0,
            goal_reached: false,
            feedback,
            message: message.into(),
        }
    }
}

/// Starts the store lifetime with the seeded counter.
///
/// # FFI contract
/// - Idempotent: an already live store is kept as is.
#[flutter_rust_bridge::frb(sync)]
pub fn store_init() -> TallyActionResponse {
    with_service(|service| service.init());
    TallyActionResponse::success("Store ready.")
}

/// Ends the store lifetime. All counters and settings are discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn store_dispose() -> TallyActionResponse {
    with_service(|service| service.teardown());
    TallyActionResponse::success("Store disposed.")
}

/// Returns the full read model.
#[flutter_rust_bridge::frb(sync)]
pub fn store_snapshot() -> TallySnapshotResponse {
    with_service(|service| {
        let pending = service.goal_notice_pending();
        match service.with_store(|store| {
            (
                store.counters().iter().map(to_counter_item).collect::<Vec<_>>(),
                store.active_counter().map(|counter| counter.id.to_string()),
                to_settings_item(store.settings()),
            )
        }) {
            Ok((counters, active_counter_id, settings)) => TallySnapshotResponse {
                ok: true,
                counters,
                active_counter_id,
                settings: Some(settings),
                goal_notice_pending: pending,
                message: String::new(),
            },
            Err(err) => TallySnapshotResponse {
                ok: false,
                counters: Vec::new(),
                active_counter_id: None,
                settings: None,
                goal_notice_pending: false,
                message: format!("store_snapshot failed: {err}"),
            },
        }
    })
}

/// Creates a counter from the add-counter form and selects it.
///
/// # FFI contract
/// - Name is trimmed; empty or longer than 20 characters fails.
/// - Goal must be within `1..=9999`.
/// - Fails once 10 counters exist.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_create(name: String, goal: u32, color: String) -> TallyActionResponse {
    match with_service(|service| service.create_counter(name.as_str(), goal, color.as_str())) {
        Ok(counter_id) => TallyActionResponse {
            ok: true,
            counter_id: Some(counter_id.to_string()),
            message: "Counter created.".to_string(),
        },
        Err(err) => TallyActionResponse::failure(format!("counter_create failed: {err}")),
    }
}

/// Saves the edit form for the active counter.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_edit_active(name: String, goal: u32, color: String) -> TallyActionResponse {
    match with_service(|service| service.edit_active_counter(name.as_str(), goal, color.as_str())) {
        Ok(()) => TallyActionResponse::success("Counter updated."),
        Err(err) => TallyActionResponse::failure(format!("counter_edit_active failed: {err}")),
    }
}

/// Deletes a counter; the first remaining one becomes active if needed.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_delete(counter_id: String) -> TallyActionResponse {
    let id = CounterId::from(counter_id.trim());
    match with_service(|service| service.delete_counter(&id)) {
        Ok(()) => TallyActionResponse::success("Counter deleted."),
        Err(err) => TallyActionResponse::failure(format!("counter_delete failed: {err}")),
    }
}

/// Selects the counter shown on the counting screen.
#[flutter_rust_bridge::frb(sync)]
pub fn counter_select(counter_id: String) -> TallyActionResponse {
    let id = CounterId::from(counter_id.trim());
    match with_service(|service| service.select_counter(id)) {
        Ok(()) => TallyActionResponse::success("Counter selected."),
        Err(err) => TallyActionResponse::failure(format!("counter_select failed: {err}")),
    }
}

/// Increments the active counter.
#[flutter_rust_bridge::frb(sync)]
pub fn count_tap() -> TallyCountResponse {
    run_count_action("count_tap", CounterService::tap)
}

/// Decrements the active counter.
#[flutter_rust_bridge::frb(sync)]
pub fn count_undo() -> TallyCountResponse {
    run_count_action("count_undo", CounterService::undo_tap)
}

/// Resets the active counter after the host's confirmation prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn count_reset() -> TallyCountResponse {
    run_count_action("count_reset", CounterService::confirm_reset)
}

/// Hides the "goal reached" notice.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_notice_dismiss() -> TallyActionResponse {
    with_service(|service| service.dismiss_goal_notice());
    TallyActionResponse::success("Goal notice dismissed.")
}

/// Merges profile changes into settings. `None` keeps the current value.
///
/// # FFI contract
/// - `avatar` must be `lotus|om|meditation`; `theme` must be `light|dark|auto`.
/// - `default_goal` must be in `1..=9999`; `display_name` at most 30 chars.
/// - Unknown or out-of-range values fail the whole call without applying
///   any field.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(
    display_name: Option<String>,
    avatar: Option<String>,
    haptic_enabled: Option<bool>,
    sound_enabled: Option<bool>,
    theme: Option<String>,
    default_goal: Option<u32>,
) -> TallyActionResponse {
    let avatar = match avatar.as_deref().map(str::trim) {
        Some(value) => match Avatar::parse(value) {
            Some(parsed) => Some(parsed),
            None => {
                return TallyActionResponse::failure(format!(
                    "settings_update failed: unknown avatar `{value}`"
                ))
            }
        },
        None => None,
    };
    let theme = match theme.as_deref().map(str::trim) {
        Some(value) => match ThemePreference::parse(value) {
            Some(parsed) => Some(parsed),
            None => {
                return TallyActionResponse::failure(format!(
                    "settings_update failed: unknown theme `{value}`"
                ))
            }
        },
        None => None,
    };

    let update = SettingsUpdate {
        display_name,
        avatar,
        haptic_enabled,
        sound_enabled,
        theme,
        default_goal,
    };
    match with_service(|service| service.update_settings(update)) {
        Ok(()) => TallyActionResponse::success("Settings updated."),
        Err(err) => TallyActionResponse::failure(format!("settings_update failed: {err}")),
    }
}

/// Resolves the theme setting against the host appearance.
///
/// Returns `light` or `dark`; falls back to the system value when the store
/// is not live.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_resolve(system_is_dark: bool) -> String {
    let system = if system_is_dark {
        Appearance::Dark
    } else {
        Appearance::Light
    };
    let resolved = with_service(|service| service.resolved_appearance(system)).unwrap_or(system);
    if resolved.is_dark() {
        "dark".to_string()
    } else {
        "light".to_string()
    }
}

fn run_count_action(
    operation: &str,
    action: fn(&mut CounterService<SignalQueue>) -> ServiceResult<TapOutcome>,
) -> TallyCountResponse {
    with_service(|service| {
        let result = action(service);
        let feedback = service.feedback().drain();
        match result {
            Ok(outcome) => TallyCountResponse {
                ok: true,
                count: outcome.count,
                goal: outcome.goal,
                progress_percent: outcome.progress_percent,
                goal_reached: outcome.goal_reached,
                feedback,
                message: String::new(),
            },
            Err(err) => TallyCountResponse::failure(format!("{operation} failed: {err}"), feedback),
        }
    })
}

fn with_service<T>(f: impl FnOnce(&mut CounterService<SignalQueue>) -> T) -> T {
    let mut guard = SERVICE.lock().unwrap_or_else(|poisoned| {
        warn!("event=service_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    });
    f(&mut guard)
}

fn to_counter_item(counter: &Counter) -> TallyCounterItem {
    TallyCounterItem {
        counter_id: counter.id.to_string(),
        name: counter.name.clone(),
        count: counter.count,
        goal: counter.goal,
        color: counter.color.clone(),
        created_at: counter.created_at,
        daily_count: counter.daily_count,
        lifetime_count: counter.lifetime_count,
        progress_percent: counter.progress_percent(),
    }
}

fn to_settings_item(settings: &AppSettings) -> TallySettingsItem {
    TallySettingsItem {
        display_name: settings.display_name.clone(),
        avatar: settings.avatar.as_str().to_string(),
        haptic_enabled: settings.haptic_enabled,
        sound_enabled: settings.sound_enabled,
        theme: settings.theme.as_str().to_string(),
        default_goal: settings.default_goal,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, count_reset, count_tap, count_undo, counter_create, counter_delete,
        counter_edit_active, counter_select, goal_notice_dismiss, init_logging, ping,
        settings_update, store_dispose, store_init, store_snapshot,
        theme_resolve,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn settings_update_rejects_unknown_values_before_touching_store() {
        let response = settings_update(None, Some("dragon".to_string()), None, None, None, None);
        assert!(!response.ok);
        assert!(response.message.contains("unknown avatar"));

        let response = settings_update(None, None, None, None, Some("system".to_string()), None);
        assert!(!response.ok);
        assert!(response.message.contains("unknown theme"));
    }

    // The service is process-wide, so the whole lifecycle runs in one test.
    #[test]
    fn store_lifecycle_counting_flow() {
        store_dispose();
        let before_init = count_tap();
        assert!(!before_init.ok);
        assert!(before_init.message.contains("lifetime"));
        assert!(!store_snapshot().ok);

        assert!(store_init().ok);
        let snapshot = store_snapshot();
        assert!(snapshot.ok, "{}", snapshot.message);
        assert_eq!(snapshot.counters.len(), 1);
        assert_eq!(snapshot.active_counter_id.as_deref(), Some("1"));

        let created = counter_create("  Mala ".to_string(), 2, "#FF9800".to_string());
        assert!(created.ok, "{}", created.message);
        let created_id = created.counter_id.expect("created counter id");

        let first = count_tap();
        assert!(first.ok, "{}", first.message);
        assert_eq!(first.feedback, vec!["impact_light".to_string()]);
        assert!(!first.goal_reached);

        let second = count_tap();
        assert!(second.goal_reached);
        assert_eq!(second.progress_percent, 100);
        assert_eq!(
            second.feedback,
            vec!["impact_light".to_string(), "success".to_string()]
        );
        assert!(store_snapshot().goal_notice_pending);
        assert!(goal_notice_dismiss().ok);
        assert!(!store_snapshot().goal_notice_pending);

        assert!(settings_update(None, None, Some(false), None, Some("dark".to_string()), None).ok);
        let zero_goal = settings_update(None, None, None, None, None, Some(0));
        assert!(!zero_goal.ok);
        assert!(zero_goal.message.contains("goal must be between"));
        let long_name = settings_update(Some("x".repeat(500)), None, None, None, None, None);
        assert!(!long_name.ok);
        assert!(long_name.message.contains("display name is too long"));
        let settings = store_snapshot().settings.expect("settings present");
        assert_eq!(settings.default_goal, 108);
        assert_eq!(settings.display_name, "Practitioner");
        let undo = count_undo();
        assert_eq!(undo.count, 1);
        assert!(undo.feedback.is_empty());
        assert_eq!(theme_resolve(false), "dark");

        let reset = count_reset();
        assert!(reset.ok);
        assert_eq!(reset.count, 0);
        let snapshot = store_snapshot();
        let mala = snapshot
            .counters
            .iter()
            .find(|item| item.counter_id == created_id)
            .expect("created counter present");
        assert_eq!((mala.count, mala.daily_count, mala.lifetime_count), (0, 1, 1));
        assert_eq!(mala.name, "Mala");

        assert!(counter_edit_active("Evening".to_string(), 216, "#00BCD4".to_string()).ok);
        assert!(!counter_edit_active(String::new(), 216, "#00BCD4".to_string()).ok);

        assert!(counter_select("1".to_string()).ok);
        assert!(counter_delete("1".to_string()).ok);
        assert_eq!(
            store_snapshot().active_counter_id.as_deref(),
            Some(created_id.as_str())
        );

        assert!(counter_delete(created_id).ok);
        let empty = store_snapshot();
        assert!(empty.counters.is_empty());
        assert!(empty.active_counter_id.is_none());
        assert!(!count_tap().ok);

        assert!(store_dispose().ok);
        assert!(!store_snapshot().ok);
        assert!(!counter_create("x".to_string(), 1, "#000000".to_string()).ok);
    }
}
