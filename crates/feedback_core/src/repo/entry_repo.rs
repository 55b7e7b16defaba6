//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide append/count/page/get APIs over `feedback_entries`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Listing order is always `created_at DESC, id DESC`.
//! - There is no update or delete path.

use crate::db::DbError;
use crate::model::entry::{
    EntryId, EntrySummary, EntryValidationError, FeedbackEntry, NewEntry,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_TABLE: &str = "feedback_entries";
const ENTRY_REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "email",
    "subject",
    "message",
    "created_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One page window over the listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPageQuery {
    pub limit: u32,
    pub offset: u64,
}

/// Entry store contract.
pub trait EntryRepository {
    /// Appends one entry stamped with `created_at` (epoch ms) and returns its id.
    fn insert_entry(&self, entry: &NewEntry, created_at: i64) -> RepoResult<EntryId>;
    /// Counts all stored entries.
    fn count_entries(&self) -> RepoResult<u64>;
    /// Returns one page of summaries, newest first.
    fn list_entries(&self, query: &EntryPageQuery) -> RepoResult<Vec<EntrySummary>>;
    /// Gets one full entry by id.
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<FeedbackEntry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the connection does not carry the expected table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entry_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(&self, entry: &NewEntry, created_at: i64) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO feedback_entries (
                first_name,
                last_name,
                email,
                subject,
                message,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.first_name.as_str(),
                entry.last_name.as_str(),
                entry.email.as_str(),
                entry.subject.as_str(),
                entry.message.as_str(),
                created_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let total: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM feedback_entries;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative entry count `{total}`")))
    }

    fn list_entries(&self, query: &EntryPageQuery) -> RepoResult<Vec<EntrySummary>> {
        let offset = i64::try_from(query.offset).map_err(|_| {
            RepoError::InvalidData(format!("page offset `{}` out of range", query.offset))
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                first_name,
                last_name,
                email,
                subject,
                created_at
             FROM feedback_entries
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2;",
        )?;

        let mut rows = stmt.query(params![i64::from(query.limit), offset])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }

        Ok(summaries)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<FeedbackEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT
                    id,
                    first_name,
                    last_name,
                    email,
                    subject,
                    message,
                    created_at
                 FROM feedback_entries
                 WHERE id = ?1;",
                [id],
                |row| {
                    Ok(FeedbackEntry {
                        id: row.get("id")?,
                        first_name: row.get("first_name")?,
                        last_name: row.get("last_name")?,
                        email: row.get("email")?,
                        subject: row.get("subject")?,
                        message: row.get("message")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;

        match entry {
            Some(entry) => {
                entry.validate()?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<EntrySummary> {
    let summary = EntrySummary {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        subject: row.get("subject")?,
        created_at: row.get("created_at")?,
    };

    if summary.id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{}` in {ENTRY_TABLE}.id",
            summary.id
        )));
    }

    Ok(summary)
}

fn ensure_entry_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, ENTRY_TABLE)? {
        return Err(RepoError::MissingRequiredTable(ENTRY_TABLE));
    }

    for &column in ENTRY_REQUIRED_COLUMNS {
        if !table_has_column(conn, ENTRY_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: ENTRY_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
