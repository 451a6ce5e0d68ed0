//! Typed errors at the pipeline seams. Everything else flows through `anyhow`.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Per-document extraction failure. Logged and counted, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("could not launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Converter {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Root folder problems. Abort the run before any worker starts.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("folder not found: {0}")]
    RootNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("strict mode: {0}")]
    Walk(String),
}

/// Bad invocation detected before the pipeline starts.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("at least one keyword is required")]
    NoKeywords,

    #[error("thread count must be at least 1")]
    ZeroConcurrency,
}
