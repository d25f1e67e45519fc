//! Flutter-facing bridge over `tally_core`.

pub mod api;
