//! Index store access: insert rows, run MATCH queries, and the single-writer [`IndexSink`].

use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;

use crate::Document;
use crate::pipeline::Sink;

use super::{INSERT_DOCUMENT_SQL, MATCH_FILENAMES_SQL};

/// Insert one `(filename, content)` row.
pub fn insert_document(conn: &Connection, filename: &str, content: &str) -> Result<()> {
    let mut stmt = conn
        .prepare_cached(INSERT_DOCUMENT_SQL)
        .context("prepare insert")?;
    stmt.execute((filename, content))
        .with_context(|| format!("insert {filename}"))?;
    Ok(())
}

/// Run one FTS5 query and return matching file names in rowid order (duplicates included).
pub fn query_filenames(conn: &Connection, query: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(MATCH_FILENAMES_SQL)
        .context("prepare search")?;
    let rows = stmt
        .query_map([query], |row| row.get::<_, String>(0))
        .with_context(|| format!("search failed for [{query}]"))?;
    let mut names = Vec::new();
    for row in rows {
        names.push(row.with_context(|| format!("search failed for [{query}]"))?);
    }
    Ok(names)
}

/// Number of rows in the documents table, or None if the count fails.
pub fn document_count(conn: &Connection) -> Option<usize> {
    conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get::<_, i64>(0))
        .ok()
        .map(|n| n.max(0) as usize)
}

/// Aggregator sink for index mode: the only writer to the store while a run is active.
pub struct IndexSink {
    conn: Connection,
}

impl IndexSink {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Sink<String> for IndexSink {
    fn accept(&mut self, document: &Document, content: String) -> Result<()> {
        insert_document(&self.conn, &document.name, &content)
    }

    fn finish(&mut self) -> Result<()> {
        debug!("Index sink drained; checkpointing WAL");
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .context("WAL checkpoint")?;
        Ok(())
    }
}
