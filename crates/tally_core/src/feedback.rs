//! Haptic feedback capability contract.
//!
//! # Responsibility
//! - Define the signal set the counting flow can emit.
//! - Invoke host capabilities fire-and-forget.
//!
//! # Invariants
//! - Capability failures are swallowed and never reach counter state.
//! - Gating on `AppSettings::haptic_enabled` is the caller's job.

use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Strength of an impact tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactStyle {
    Light,
    Medium,
}

/// Feedback the counting flow can request from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackSignal {
    /// Short tap on increment (`Light`) or decrement (`Medium`).
    Impact(ImpactStyle),
    /// Goal reached or reset confirmed.
    Success,
}

impl FeedbackSignal {
    /// Stable string id for logs and host bridges.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Impact(ImpactStyle::Light) => "impact_light",
            Self::Impact(ImpactStyle::Medium) => "impact_medium",
            Self::Success => "success",
        }
    }
}

/// Host capability failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// Platform has no haptic engine.
    Unavailable,
    Failed(String),
}

impl Display for FeedbackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "feedback capability is unavailable"),
            Self::Failed(message) => write!(f, "feedback capability failed: {message}"),
        }
    }
}

impl Error for FeedbackError {}

/// Host-provided haptic sink.
pub trait FeedbackCapability {
    fn emit(&self, signal: FeedbackSignal) -> Result<(), FeedbackError>;
}

/// Capability for hosts without haptics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl FeedbackCapability for NoopFeedback {
    fn emit(&self, _signal: FeedbackSignal) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Emits `signal` and discards any failure.
pub fn fire_and_forget(capability: &dyn FeedbackCapability, signal: FeedbackSignal) {
    if let Err(err) = capability.emit(signal) {
        debug!(
            "event=feedback_emit module=feedback status=ignored signal={} error={}",
            signal.as_str(),
            err
        );
    }
}
