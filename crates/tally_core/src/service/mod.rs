//! Core use-case services.
//!
//! # Responsibility
//! - Turn user gestures into validated store mutations.
//! - Keep host/FFI layers free of counting-screen rules.

pub mod counter_service;
pub mod goal_tracker;
