//! Counter use-case service.
//!
//! # Responsibility
//! - Validate create/edit input before it reaches the store.
//! - Run the counting flow: feedback on taps, goal crossing detection,
//!   the pending "goal reached" notice and reset confirmation.
//!
//! # Invariants
//! - Names are trimmed and hold `1..=MAX_NAME_CHARS` characters.
//! - Goals lie in `MIN_GOAL..=MAX_GOAL`.
//! - At most `MAX_COUNTERS` counters are created through this service.
//! - Settings keep `default_goal` in the goal range and the display name
//!   within `MAX_DISPLAY_NAME_CHARS`.
//! - Feedback is emitted only when `haptic_enabled` is set, and its failures
//!   never affect counter state.

use crate::feedback::{fire_and_forget, FeedbackCapability, FeedbackSignal, ImpactStyle};
use crate::model::counter::{
    CounterDraft, CounterId, CounterUpdate, MAX_COUNTERS, MAX_GOAL, MAX_NAME_CHARS, MIN_GOAL,
};
use crate::model::settings::MAX_DISPLAY_NAME_CHARS;
use crate::model::settings::{AppSettings, Appearance, SettingsUpdate};
use crate::service::goal_tracker::GoalTracker;
use crate::store::context::{StoreAccessError, StoreContext};
use crate::store::counter_store::{CounterStore, StoreSnapshot};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for counter use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterServiceError {
    /// Name is empty after trimming.
    EmptyName,
    /// Name exceeds the character limit.
    NameTooLong { max: usize, actual: usize },
    /// Profile display name exceeds the character limit.
    DisplayNameTooLong { max: usize, actual: usize },
    /// Goal outside `MIN_GOAL..=MAX_GOAL`.
    InvalidGoal(u32),
    /// Creating another counter would exceed the cap.
    CounterLimitReached { limit: usize },
    /// The operation needs an active counter and none is selected.
    NoActiveCounter,
    /// Store accessed outside its lifetime.
    Store(StoreAccessError),
}

impl Display for CounterServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "counter name must not be empty"),
            Self::NameTooLong { max, actual } => write!(
                f,
                "counter name is too long: {actual} characters (max {max})"
            ),
            Self::DisplayNameTooLong { max, actual } => write!(
                f,
                "display name is too long: {actual} characters (max {max})"
            ),
            Self::InvalidGoal(goal) => write!(
                f,
                "goal must be between {MIN_GOAL} and {MAX_GOAL}, got {goal}"
            ),
            Self::CounterLimitReached { limit } => {
                write!(f, "counter limit reached ({limit})")
            }
            Self::NoActiveCounter => write!(f, "no counter selected"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CounterServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreAccessError> for CounterServiceError {
    fn from(value: StoreAccessError) -> Self {
        Self::Store(value)
    }
}

pub type ServiceResult<T> = Result<T, CounterServiceError>;

/// Outcome of one count mutation as seen by the counting screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapOutcome {
    pub count: u32,
    pub goal: u32,
    /// Rounded `0..=100` progress towards the goal.
    pub progress_percent: u8,
    /// `true` only on the mutation that crossed the goal.
    pub goal_reached: bool,
}

/// Use-case service over a store lifetime and a host feedback capability.
pub struct CounterService<F: FeedbackCapability> {
    context: StoreContext,
    feedback: F,
    tracker: GoalTracker,
    goal_notice_pending: bool,
}

impl<F: FeedbackCapability> CounterService<F> {
    /// Creates a service with a live, seeded store.
    pub fn new(feedback: F) -> Self {
        let mut context = StoreContext::new();
        context.init();
        Self::with_context(context, feedback)
    }

    /// Creates a service over an existing context, initialized or not.
    pub fn with_context(context: StoreContext, feedback: F) -> Self {
        let mut service = Self {
            context,
            feedback,
            tracker: GoalTracker::new(),
            goal_notice_pending: false,
        };
        service.rebaseline();
        service
    }

    /// Starts the store lifetime if it is not live yet.
    pub fn init(&mut self) {
        self.context.init();
        self.rebaseline();
    }

    /// Ends the store lifetime and clears transient screen state.
    pub fn teardown(&mut self) {
        self.context.teardown();
        self.tracker = GoalTracker::new();
        self.goal_notice_pending = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_initialized()
    }

    /// The injected feedback capability.
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Runs `f` with read access to the store.
    pub fn with_store<T>(&self, f: impl FnOnce(&CounterStore) -> T) -> ServiceResult<T> {
        Ok(self.context.with_store(f)?)
    }

    pub fn snapshot(&self) -> ServiceResult<StoreSnapshot> {
        self.with_store(CounterStore::snapshot)
    }

    pub fn settings(&self) -> ServiceResult<AppSettings> {
        self.with_store(|store| store.settings().clone())
    }

    /// Creates a validated counter and selects it.
    ///
    /// # Contract
    /// - Name is trimmed before validation and storage.
    /// - New counters start at zero.
    pub fn create_counter(
        &mut self,
        name: &str,
        goal: u32,
        color: &str,
    ) -> ServiceResult<CounterId> {
        let name = validate_name(name)?;
        validate_goal(goal)?;

        let id = self.context.with_store_mut(|store| {
            if store.len() >= MAX_COUNTERS {
                return Err(CounterServiceError::CounterLimitReached {
                    limit: MAX_COUNTERS,
                });
            }
            Ok(store.add_counter(CounterDraft::new(name, goal, color)))
        })??;

        self.tracker.reset_baseline(0);
        self.goal_notice_pending = false;
        info!("event=counter_create module=service status=ok goal={goal}");
        Ok(id)
    }

    /// Creates a counter using `settings.default_goal`.
    pub fn create_counter_with_default_goal(
        &mut self,
        name: &str,
        color: &str,
    ) -> ServiceResult<CounterId> {
        let goal = self.with_store(|store| store.settings().default_goal)?;
        self.create_counter(name, goal, color)
    }

    /// Replaces name, goal and colour of the active counter.
    pub fn edit_active_counter(
        &mut self,
        name: &str,
        goal: u32,
        color: &str,
    ) -> ServiceResult<()> {
        let name = validate_name(name)?;
        validate_goal(goal)?;

        self.context.with_store_mut(|store| {
            let id = store
                .active_counter()
                .map(|counter| counter.id.clone())
                .ok_or(CounterServiceError::NoActiveCounter)?;
            store.update_counter(&id, CounterUpdate::new().name(name).goal(goal).color(color));
            Ok::<(), CounterServiceError>(())
        })??;

        self.observe_active()?;
        Ok(())
    }

    /// Selects `id` and re-seeds goal detection with its count.
    ///
    /// Unknown ids are accepted, matching `CounterStore::set_active_counter`.
    pub fn select_counter(&mut self, id: CounterId) -> ServiceResult<()> {
        self.context
            .with_store_mut(|store| store.set_active_counter(id))?;
        self.goal_notice_pending = false;
        self.rebaseline();
        Ok(())
    }

    pub fn delete_counter(&mut self, id: &CounterId) -> ServiceResult<()> {
        let active_changed = self.context.with_store_mut(|store| {
            let was_active = store.active_counter_id() == Some(id);
            store.delete_counter(id);
            was_active
        })?;
        if active_changed {
            self.goal_notice_pending = false;
            self.rebaseline();
        }
        info!("event=counter_delete module=service status=ok active_changed={active_changed}");
        Ok(())
    }

    /// Increments the active counter.
    pub fn tap(&mut self) -> ServiceResult<TapOutcome> {
        self.mutate_count(ImpactStyle::Light, CounterStore::increment_count)
    }

    /// Decrements the active counter.
    pub fn undo_tap(&mut self) -> ServiceResult<TapOutcome> {
        self.mutate_count(ImpactStyle::Medium, CounterStore::decrement_count)
    }

    /// Zeroes the active counter after the user confirmed the reset prompt.
    pub fn confirm_reset(&mut self) -> ServiceResult<TapOutcome> {
        self.require_active()?;
        self.context.with_store_mut(CounterStore::reset_count)?;
        self.goal_notice_pending = false;
        let outcome = self.observe_active()?;
        self.emit_if_enabled(FeedbackSignal::Success)?;
        Ok(outcome)
    }

    /// Whether a "goal reached" notice is waiting to be shown or dismissed.
    pub fn goal_notice_pending(&self) -> bool {
        self.goal_notice_pending
    }

    pub fn dismiss_goal_notice(&mut self) {
        self.goal_notice_pending = false;
    }

    /// Merges validated profile changes into settings.
    ///
    /// # Contract
    /// - `default_goal` must lie in `MIN_GOAL..=MAX_GOAL`.
    /// - `display_name` holds at most `MAX_DISPLAY_NAME_CHARS` characters.
    /// - A rejected update leaves every field untouched.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> ServiceResult<()> {
        if let Some(goal) = update.default_goal {
            validate_goal(goal)?;
        }
        if let Some(display_name) = update.display_name.as_deref() {
            let actual = display_name.chars().count();
            if actual > MAX_DISPLAY_NAME_CHARS {
                return Err(CounterServiceError::DisplayNameTooLong {
                    max: MAX_DISPLAY_NAME_CHARS,
                    actual,
                });
            }
        }
        Ok(self
            .context
            .with_store_mut(|store| store.update_settings(update))?)
    }

    /// Resolves the theme preference against the host appearance.
    pub fn resolved_appearance(&self, system: Appearance) -> ServiceResult<Appearance> {
        self.with_store(|store| store.settings().theme.resolve(system))
    }

    fn mutate_count(
        &mut self,
        impact: ImpactStyle,
        mutation: fn(&mut CounterStore),
    ) -> ServiceResult<TapOutcome> {
        self.require_active()?;
        self.emit_if_enabled(FeedbackSignal::Impact(impact))?;
        self.context.with_store_mut(mutation)?;
        self.observe_active()
    }

    /// Runs goal detection on the active counter and raises the notice.
    fn observe_active(&mut self) -> ServiceResult<TapOutcome> {
        let (count, goal, progress_percent) = self
            .with_store(|store| {
                store
                    .active_counter()
                    .map(|counter| (counter.count, counter.goal, counter.progress_percent()))
            })?
            .ok_or(CounterServiceError::NoActiveCounter)?;

        let goal_reached = self.tracker.observe(count, goal).is_reached();
        if goal_reached {
            self.goal_notice_pending = true;
            info!("event=goal_reached module=service status=ok goal={goal}");
            self.emit_if_enabled(FeedbackSignal::Success)?;
        }
        Ok(TapOutcome {
            count,
            goal,
            progress_percent,
            goal_reached,
        })
    }

    fn require_active(&self) -> ServiceResult<()> {
        let has_active = self.with_store(|store| store.active_counter().is_some())?;
        if has_active {
            Ok(())
        } else {
            debug!("event=count_mutation module=service status=noop reason=no_active_counter");
            Err(CounterServiceError::NoActiveCounter)
        }
    }

    fn emit_if_enabled(&self, signal: FeedbackSignal) -> ServiceResult<()> {
        if self.with_store(|store| store.settings().haptic_enabled)? {
            fire_and_forget(&self.feedback, signal);
        }
        Ok(())
    }

    fn rebaseline(&mut self) {
        if !self.context.is_initialized() {
            self.tracker = GoalTracker::new();
            return;
        }
        let count = self
            .context
            .with_store(|store| store.active_counter().map(|counter| counter.count))
            .ok()
            .flatten()
            .unwrap_or(0);
        self.tracker.reset_baseline(count);
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CounterServiceError::EmptyName);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_NAME_CHARS {
        return Err(CounterServiceError::NameTooLong {
            max: MAX_NAME_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

fn validate_goal(goal: u32) -> ServiceResult<()> {
    if (MIN_GOAL..=MAX_GOAL).contains(&goal) {
        Ok(())
    } else {
        Err(CounterServiceError::InvalidGoal(goal))
    }
}
