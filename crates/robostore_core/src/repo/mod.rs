//! Repository layer over the generic item store.
//!
//! # Responsibility
//! - Expose use-case oriented data access for robots.
//! - Keep store details (item envelopes, index names) out of callers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to store transport errors.

pub mod robot_repo;
