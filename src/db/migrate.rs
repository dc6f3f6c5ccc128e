//! Versioned schema migrations.
//!
//! Each migration runs once inside its own transaction and is recorded as a
//! `migration_applied` row in the `log` table, keyed by its version string.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250626_0001_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
        "#,
    },
    Migration {
        version: "20250626_0002_create_events",
        description: "Created events table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS events (
            id                   TEXT PRIMARY KEY,
            title                TEXT NOT NULL,
            description          TEXT,
            date                 TEXT NOT NULL,
            location             TEXT NOT NULL,
            image                TEXT,
            volunteer_positions  TEXT DEFAULT '[]',
            user_id              INTEGER,
            created_at           TEXT NOT NULL,
            updated_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);
        CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id);
        CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at);
        "#,
    },
    Migration {
        version: "20250626_0003_create_volunteer_registrations",
        description: "Created volunteer_registrations table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS volunteer_registrations (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id       TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            user_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            position       TEXT NOT NULL,
            registered_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_registrations_user_id ON volunteer_registrations(user_id);
        CREATE INDEX IF NOT EXISTS idx_registrations_event_id ON volunteer_registrations(event_id);
        CREATE INDEX IF NOT EXISTS idx_registrations_event_position
            ON volunteer_registrations(event_id, position);
        CREATE UNIQUE INDEX IF NOT EXISTS unique_user_event_position
            ON volunteer_registrations(user_id, event_id, position);
        "#,
    },
    Migration {
        version: "20250702_0004_create_volunteer_profiles",
        description: "Created volunteer_profiles table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS volunteer_profiles (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            skills         TEXT NOT NULL DEFAULT '[]',
            age            INTEGER NOT NULL,
            gender         TEXT NOT NULL,
            contact_email  TEXT NOT NULL,
            is_public      INTEGER NOT NULL DEFAULT 1,
            created_at     TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists. It doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(migration.sql).map_err(|e| {
        AppError::Migration(format!("{} failed: {}", migration.version, e))
    })?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![
            chrono::Local::now().to_rfc3339(),
            migration.version,
            migration.description
        ],
    )?;

    tx.commit()?;
    Ok(())
}

/// Versions that are known but not yet applied, in order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db`, `db --migrate` and at server start.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Apply what is missing, oldest first
    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied.push(m.version);
    }

    Ok(applied)
}
