//! Counter state container and its lifetime owner.
//!
//! # Responsibility
//! - Keep all counter/settings state in memory for the process lifetime.
//! - Expose a read model and total mutation operations.
//!
//! # Invariants
//! - Nothing in this layer performs I/O or persistence.

pub mod context;
pub mod counter_store;
