//! Domain model for feedback intake.
//!
//! # Responsibility
//! - Define the persisted entry shape and its listing projection.
//! - Own form normalization and the field validation table.
//!
//! # Invariants
//! - Every persisted entry is identified by a store-assigned `EntryId`.
//! - Entries are append-only: no update or delete path exists in core.

pub mod entry;
pub mod sanitize;
pub mod submission;
