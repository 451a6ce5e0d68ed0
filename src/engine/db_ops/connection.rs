//! Open the index database.

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use super::{DOCUMENTS_TABLE_EXISTS_SQL, SCHEMA, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create FTS5 table")?;
    Ok(())
}

pub fn db_exists(path: &Path) -> bool {
    path.is_file()
}

/// Open or create the index DB and ensure schema + WAL. Creates the parent directory if needed.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create DB directory {}", parent.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open a DB that must already exist and already hold the documents table.
/// Query mode never creates or alters a store.
pub fn open_existing_db(path: &Path) -> Result<Connection> {
    if !db_exists(path) {
        anyhow::bail!("index not found: {}", path.display());
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open database {}", path.display()))?;
    let has_table = conn
        .query_row(DOCUMENTS_TABLE_EXISTS_SQL, [], |row| row.get::<_, i64>(0))
        .context("read schema")?;
    if has_table == 0 {
        anyhow::bail!("not a pdfsift index (no documents table): {}", path.display());
    }
    Ok(conn)
}

/// Open an in-memory DB with the same schema (tests; no WAL pragmas needed).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    conn.execute_batch(SCHEMA).context("create FTS5 table")?;
    Ok(conn)
}
