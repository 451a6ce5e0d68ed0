//! Engine module: extraction, keyword evaluation, store access, progress, CLI.

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod extract;
pub mod predicate;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, CommonArgs, KeywordArgs};
pub use cli::handle_run;
pub use db_ops::{
    IndexSink, db_exists, document_count, insert_document, open_db, open_db_in_memory,
    open_existing_db, query_filenames,
};
pub use extract::{CommandExtractor, Extractor};
pub use predicate::build_fts_query;
pub use progress::Progress;
pub use tools::{glob_match, has_extension, is_excluded, is_os_hidden_file};
