//! Ordered schema scripts for the entry store.
//!
//! Versions are strictly increasing and never renumbered once shipped.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "feedback_entries",
        sql: include_str!("0001_feedback_entries.sql"),
    },
    Migration {
        version: 2,
        name: "entry_listing_index",
        sql: include_str!("0002_entry_listing_index.sql"),
    },
];

/// Latest schema version this build can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`].
///
/// Pending scripts share one transaction, so a failing script leaves the
/// previous version in place.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let fail = |source| DbError::MigrationFailed {
            version: migration.version,
            name: migration.name,
            source,
        };
        tx.execute_batch(migration.sql).map_err(fail)?;
        tx.pragma_update(None, "user_version", migration.version)
            .map_err(fail)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={latest} applied={}",
        pending.len()
    );
    Ok(())
}
