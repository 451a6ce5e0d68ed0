//! pdfsift: bounded-concurrency text extraction over a folder of documents.
//!
//! Two modes share one pipeline (walk → extraction workers → single aggregator):
//! [`index_dir`] appends extracted text to a SQLite FTS5 table, [`scan_dir`] keeps documents
//! whose text matches a [`KeywordPredicate`]. [`query_index`] searches an existing index
//! without extracting anything.

pub mod engine;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::extract::{CommandExtractor, Extractor};
pub use error::{ExtractionError, TraversalError, UsageError};
pub use index::index_dir;
pub use search::{QueryResult, query_index, scan_dir};

/// Result alias used by public pdfsift API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
