//! Feedback use-case service.
//!
//! # Responsibility
//! - Validate and persist submissions with a server-assigned timestamp.
//! - Normalize paging input and return one page plus the total count.
//! - Fetch one full entry by id.
//!
//! # Invariants
//! - A submission appends exactly one row or none at all.
//! - `page >= 1` and `1 <= per_page <= 50` after normalization.
//! - Logged events carry ids and counts only, never form content.

use crate::model::entry::{EntryId, EntrySummary, FeedbackEntry};
use crate::model::submission::SubmissionForm;
use crate::repo::entry_repo::{EntryPageQuery, EntryRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Page size used when the caller does not send one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 50;

/// Failure taxonomy shared by every feedback operation.
#[derive(Debug)]
pub enum FeedbackError {
    /// User-correctable field problems, in validation table order.
    Validation(Vec<String>),
    /// Missing capability or anti-forgery token.
    Unauthorized,
    /// Detail id missing, non-numeric or not positive.
    InvalidId,
    /// No entry with this id.
    NotFound(EntryId),
    /// Underlying persistence failure.
    Store(RepoError),
}

impl Display for FeedbackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {}", errors.join(" ")),
            Self::Unauthorized => write!(f, "caller is not authorized"),
            Self::InvalidId => write!(f, "entry id must be a positive integer"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FeedbackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FeedbackError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Raw paging input. `None` means the caller omitted the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// One listing page with the values actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPage {
    pub total: u64,
    pub page: u64,
    pub per_page: u32,
    pub rows: Vec<EntrySummary>,
}

impl EntryPage {
    /// Number of pages needed for `total` rows; at least one.
    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.per_page)
    }
}

/// Feedback service facade over a repository implementation.
pub struct FeedbackService<R: EntryRepository> {
    repo: R,
    clock: fn() -> i64,
}

impl<R: EntryRepository> FeedbackService<R> {
    /// Creates a service stamping entries with the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, unix_now_ms)
    }

    /// Creates a service stamping entries with `clock` (epoch ms).
    pub fn with_clock(repo: R, clock: fn() -> i64) -> Self {
        Self { repo, clock }
    }

    /// Validates and persists one submission.
    ///
    /// # Errors
    /// - `Validation` with every field message when the form is invalid.
    /// - `Store` when the insert fails.
    pub fn submit(&self, form: &SubmissionForm) -> Result<FeedbackEntry, FeedbackError> {
        let started_at = Instant::now();
        let entry = match form.validate() {
            Ok(entry) => entry,
            Err(errors) => {
                info!(
                    "event=feedback_submit module=service status=rejected error_count={}",
                    errors.len()
                );
                return Err(FeedbackError::Validation(errors));
            }
        };

        let created_at = (self.clock)();
        let id = match self.repo.insert_entry(&entry, created_at) {
            Ok(id) => id,
            Err(err) => {
                error!(
                    "event=feedback_submit module=service status=error duration_ms={} error_code=insert_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        info!(
            "event=feedback_submit module=service status=ok entry_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        Ok(FeedbackEntry {
            id,
            first_name: entry.first_name,
            last_name: entry.last_name,
            email: entry.email,
            subject: entry.subject,
            message: entry.message,
            created_at,
        })
    }

    /// Returns one page of summaries, newest first, plus the total count.
    pub fn list(&self, request: PageRequest) -> Result<EntryPage, FeedbackError> {
        let page = normalize_page(request.page);
        let per_page = normalize_per_page(request.per_page);

        let total = self.repo.count_entries().map_err(|err| {
            error!(
                "event=feedback_list module=service status=error error_code=count_failed error={err}"
            );
            FeedbackError::from(err)
        })?;

        let offset = (page - 1).saturating_mul(u64::from(per_page));
        let rows = if offset >= total {
            Vec::new()
        } else {
            self.repo
                .list_entries(&EntryPageQuery {
                    limit: per_page,
                    offset,
                })
                .map_err(|err| {
                    error!(
                        "event=feedback_list module=service status=error error_code=page_failed error={err}"
                    );
                    FeedbackError::from(err)
                })?
        };

        info!(
            "event=feedback_list module=service status=ok page={page} per_page={per_page} total={total} rows={}",
            rows.len()
        );

        Ok(EntryPage {
            total,
            page,
            per_page,
            rows,
        })
    }

    /// Gets one full entry.
    ///
    /// # Errors
    /// - `InvalidId` when `id <= 0`.
    /// - `NotFound` when no entry has this id.
    pub fn get(&self, id: EntryId) -> Result<FeedbackEntry, FeedbackError> {
        if id <= 0 {
            return Err(FeedbackError::InvalidId);
        }

        match self.repo.get_entry(id) {
            Ok(Some(entry)) => {
                info!("event=feedback_get module=service status=ok entry_id={id}");
                Ok(entry)
            }
            Ok(None) => {
                warn!("event=feedback_get module=service status=not_found entry_id={id}");
                Err(FeedbackError::NotFound(id))
            }
            Err(err) => {
                error!(
                    "event=feedback_get module=service status=error entry_id={id} error_code=read_failed error={err}"
                );
                Err(err.into())
            }
        }
    }
}

/// Normalizes a 1-based page number: missing or zero becomes 1.
pub fn normalize_page(page: Option<u64>) -> u64 {
    page.unwrap_or(1).max(1)
}

/// Normalizes a page size: missing becomes 10, then clamped to `[1, 50]`.
pub fn normalize_per_page(per_page: Option<u64>) -> u32 {
    match per_page {
        None => DEFAULT_PER_PAGE,
        Some(value) => {
            u32::try_from(value.clamp(1, u64::from(MAX_PER_PAGE))).unwrap_or(MAX_PER_PAGE)
        }
    }
}

/// Pages needed to show `total` rows at `per_page`; at least one.
pub fn page_count(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page.max(1))).max(1)
}

fn unix_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
