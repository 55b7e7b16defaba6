//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entry store contract used by the handlers.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `NewEntry::validate()` before persistence.
//! - Read paths reject invalid persisted rows instead of masking them.

pub mod entry_repo;
