//! Database operations: FTS5 schema, open, insert, query.

mod connection;
mod store;

pub use connection::{db_exists, open_db, open_db_in_memory, open_existing_db};
pub use store::{IndexSink, document_count, insert_document, query_filenames};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert statement for the documents table. No uniqueness: re-indexing appends duplicates.
pub(crate) const INSERT_DOCUMENT_SQL: &str =
    "INSERT INTO documents (filename, content) VALUES (?1, ?2)";

/// One MATCH against the content column; returns file names.
pub(crate) const MATCH_FILENAMES_SQL: &str =
    "SELECT filename FROM documents WHERE content MATCH ?1";

/// 1 if the documents table exists, else 0.
pub(crate) const DOCUMENTS_TABLE_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'documents'";

/// Full-text table: document identifier and its extracted text.
pub(crate) const SCHEMA: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS documents USING fts5(filename, content);
"#;
