//! Rising-edge goal crossing detection.

/// Result of observing one count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalEvent {
    None,
    /// Count moved from below the goal to at/above it.
    Reached,
}

impl GoalEvent {
    pub fn is_reached(self) -> bool {
        self == Self::Reached
    }
}

/// Remembers the previously observed count so a plateau fires only once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalTracker {
    previous_count: u32,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares against the previous count, then records `count`.
    pub fn observe(&mut self, count: u32, goal: u32) -> GoalEvent {
        let event = if self.previous_count < goal && count >= goal {
            GoalEvent::Reached
        } else {
            GoalEvent::None
        };
        self.previous_count = count;
        event
    }

    /// Re-seeds the previous count, e.g. after switching counters.
    pub fn reset_baseline(&mut self, count: u32) {
        self.previous_count = count;
    }

    pub fn previous_count(&self) -> u32 {
        self.previous_count
    }
}

#[cfg(test)]
mod tests {
    use super::{GoalEvent, GoalTracker};

    #[test]
    fn fires_once_per_crossing() {
        let mut tracker = GoalTracker::new();
        assert_eq!(tracker.observe(1, 2), GoalEvent::None);
        assert_eq!(tracker.observe(2, 2), GoalEvent::Reached);
        assert_eq!(tracker.observe(3, 2), GoalEvent::None);
        assert_eq!(tracker.observe(3, 2), GoalEvent::None);
    }

    #[test]
    fn dropping_below_and_climbing_back_fires_again() {
        let mut tracker = GoalTracker::new();
        assert!(tracker.observe(2, 2).is_reached());
        assert_eq!(tracker.observe(1, 2), GoalEvent::None);
        assert!(tracker.observe(2, 2).is_reached());
    }

    #[test]
    fn baseline_above_goal_suppresses_event() {
        let mut tracker = GoalTracker::new();
        tracker.reset_baseline(10);
        assert_eq!(tracker.observe(11, 5), GoalEvent::None);
        assert_eq!(tracker.previous_count(), 11);
    }
}
