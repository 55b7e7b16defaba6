//! Core domain logic for feedback intake and admin browsing.
//! This crate is the single source of truth for entry invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::capability::{CallerContext, CallerProfile, Capability};
pub use auth::nonce::{AntiForgery, NonceAction, NonceError};
pub use config::{ConfigError, FeedbackConfig};
pub use endpoint::bootstrap::{bootstrap_page, PageBootstrap, UiStrings};
pub use endpoint::dispatch::FeedbackEndpoint;
pub use endpoint::wire::{
    DetailPayload, EndpointRequest, EndpointResponse, Envelope, ErrorsPayload, ListPayload,
    MessagePayload, Operation,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{EntryId, EntrySummary, EntryValidationError, FeedbackEntry, NewEntry};
pub use model::submission::{FormField, SubmissionForm};
pub use repo::entry_repo::{
    EntryPageQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::feedback_service::{EntryPage, FeedbackError, FeedbackService, PageRequest};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
