use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Transaction};

use super::helpers::has_column;
use crate::settings;

const CURRENT_SCHEMA_VERSION: i32 = 3;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "database version ({}) is newer than supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }

    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;

    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&tx, next_version)
            .with_context(|| format!("migration to version {next_version} failed"))?;
        version = next_version;
    }

    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit migrations")?;

    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<()> {
    match version {
        1 => {
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to execute schema_v1.sql")?;
            Ok(())
        }
        // v2 is additive columns only. Databases created before versioning may
        // already carry some of them, so each ALTER is guarded.
        2 => {
            if !has_column(tx, "work_sessions", "company_id")? {
                tx.execute(
                    "ALTER TABLE work_sessions
                     ADD COLUMN company_id INTEGER REFERENCES companies(id) ON DELETE CASCADE",
                    [],
                )?;
            }
            if !has_column(tx, "work_sessions", "note")? {
                tx.execute("ALTER TABLE work_sessions ADD COLUMN note TEXT", [])?;
            }
            if !has_column(tx, "companies", "excel_column")? {
                tx.execute("ALTER TABLE companies ADD COLUMN excel_column TEXT", [])?;
            }
            if !has_column(tx, "companies", "note_column")? {
                tx.execute("ALTER TABLE companies ADD COLUMN note_column TEXT", [])?;
            }
            if !has_column(tx, "companies", "note_required")? {
                tx.execute(
                    "ALTER TABLE companies ADD COLUMN note_required INTEGER NOT NULL DEFAULT 0",
                    [],
                )?;
            }
            Ok(())
        }
        3 => {
            tx.execute_batch(include_str!("schemas/schema_v3.sql"))
                .context("failed to execute schema_v3.sql")?;
            Ok(())
        }
        _ => bail!("unknown migration target version: {version}"),
    }
}

/// Post-migration seeding, run on every open:
/// the fallback company, the NULL company backfill, and any missing default
/// settings. Existing rows are never overwritten.
pub fn seed_defaults(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO companies (name) VALUES ('Unassigned')",
        [],
    )
    .context("failed to ensure the Unassigned company")?;

    conn.execute(
        "UPDATE work_sessions
         SET company_id = (SELECT id FROM companies WHERE name = 'Unassigned')
         WHERE company_id IS NULL",
        [],
    )
    .context("failed to backfill unassigned sessions")?;

    let mut insert = conn
        .prepare("INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)")
        .context("failed to prepare settings seed statement")?;
    for (key, value) in settings::DEFAULTS {
        insert.execute(params![key, value])?;
    }

    Ok(())
}
