use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Extract text from a folder of documents: index it into SQLite FTS5, or scan it for keywords.
#[derive(Clone, Debug, Parser)]
#[command(name = "pdfsift", version)]
#[command(about = "Index or keyword-search a folder of PDFs with a bounded pool of text extractors.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Extract every document and append its text to the index.
    Index {
        #[command(flatten)]
        common: CommonArgs,

        /// Index database path. Default: index.db.
        #[arg(long)]
        db: Option<PathBuf>,

        /// Create a missing index without asking.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Extract every document and report those containing the keywords.
    Scan {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        search: KeywordArgs,
    },

    /// Search an existing index with one full-text query (no extraction).
    Query {
        /// Index database path. Default: index.db.
        #[arg(long)]
        db: Option<PathBuf>,

        /// Folder holding the indexed documents (used by --save). Default: ./pdfs.
        #[arg(long, value_name = "DIR")]
        folder: Option<PathBuf>,

        /// Verbose output.
        #[arg(long, short = 'v')]
        verbose: bool,

        #[command(flatten)]
        search: KeywordArgs,
    },
}

/// Flags shared by the modes that walk and extract.
#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Folder to search for documents. Default: ./pdfs.
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Max concurrent extractions. Default: 8.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Document extension, case-insensitive. Default: pdf.
    #[arg(long)]
    pub ext: Option<String>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    #[arg(long, short = 'f')]
    pub follow_links: bool,

    /// Strict mode: fail on the first unreadable entry instead of skipping.
    #[arg(long)]
    pub strict: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// No progress bar.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Keyword flags for scan and query.
#[derive(Clone, Debug, Args)]
pub struct KeywordArgs {
    /// Require all keywords to appear (AND). Default: any keyword (OR).
    #[arg(long)]
    pub all: bool,

    /// Treat the keywords as one exact phrase.
    #[arg(long)]
    pub exact: bool,

    /// Copy matched documents into this folder (created if absent).
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,

    /// Keywords to search for.
    #[arg(value_name = "KEYWORD", required = true, num_args = 1..)]
    pub keywords: Vec<String>,
}
