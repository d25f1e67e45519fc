//! Domain model for tally counters and user preferences.
//!
//! # Responsibility
//! - Define the records held by `CounterStore`.
//! - Define explicit field-level update descriptors for counters and settings.
//!
//! # Invariants
//! - Every counter is identified by a stable `CounterId`.
//! - Deletion is a hard removal; nothing is tombstoned or persisted.

pub mod counter;
pub mod settings;
