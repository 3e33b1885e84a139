//! Roster schema migrations.
//!
//! # Invariants
//! - `version` values are strictly increasing; `PRAGMA user_version` holds the
//!   last applied one.
//! - Pending steps run in a single transaction: a failing step leaves the
//!   store at its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    // `teams` and `members`; a deleted team leaves its members teamless.
    Migration {
        version: 1,
        name: "member_team_schema",
        sql: include_str!("0001_init.sql"),
    },
    // Team joins, age range filters and team-name search.
    Migration {
        version: 2,
        name: "member_lookup_indexes",
        sql: include_str!("0002_member_indexes.sql"),
    },
];

/// Latest roster schema version this binary can open.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Name of the migration that produces `version`, if it exists.
pub fn migration_name(version: u32) -> Option<&'static str> {
    MIGRATIONS
        .iter()
        .find(|migration| migration.version == version)
        .map(|migration| migration.name)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store is newer than this binary.
/// - `MigrationFailed` naming the step whose SQL failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();
    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .skip_while(|migration| migration.version <= current_version)
    {
        let script = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&script)
            .map_err(|source| DbError::MigrationFailed {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, migration_name, MIGRATIONS};

    #[test]
    fn versions_increase_and_names_are_distinct() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
            assert_ne!(pair[0].name, pair[1].name);
        }
        assert_eq!(latest_version(), 2);
    }

    #[test]
    fn names_resolve_by_version() {
        assert_eq!(migration_name(1), Some("member_team_schema"));
        assert_eq!(migration_name(2), Some("member_lookup_indexes"));
        assert_eq!(migration_name(3), None);
    }
}
