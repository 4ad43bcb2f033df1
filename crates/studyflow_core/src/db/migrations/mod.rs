//! Chunk-store schema steps, tracked in `PRAGMA user_version`.
//!
//! All pending steps run in one transaction: a failed step leaves the store at
//! its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One schema step; `version` is what `user_version` reads once it applied.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: [SchemaStep; 1] = [SchemaStep {
    version: 1,
    name: "study_chunks",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer build.
/// - Any SQLite failure; nothing is committed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    let target = latest_version();
    if found > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: target,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={target} steps={}",
        pending.len()
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    debug!(
        "event=db_step module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}
