//! Domain model for robots and the listings they belong to.
//!
//! # Responsibility
//! - Define the typed records persisted through the item store.
//! - Own field-level validation so every store sees the same rules.
//!
//! # Invariants
//! - A robot id is generated once and never reassigned.
//! - Timestamps are Unix epoch seconds.

pub mod listing;
pub mod robot;
pub mod timestamp;
