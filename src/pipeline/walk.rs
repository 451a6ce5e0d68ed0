//! Traverser: walk the root folder and collect candidate documents.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::engine::tools::{check_root_and_canonicalize, has_extension, is_excluded, is_os_hidden_file};
use crate::error::TraversalError;
use crate::{Document, Opts};

/// One result from a directory walk: either a path to consider or an error with optional path.
pub enum WalkOutcome {
    File(PathBuf),
    Skip,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Directories and other non-files become `Skip`.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Skip,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Documents found plus entries that could not be read (non-strict mode).
#[derive(Debug, Default)]
pub struct WalkResult {
    pub documents: Vec<Document>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Every regular file under `opts.folder` with the configured extension, sorted by path.
///
/// The root must exist and be a readable directory. Unreadable entries below it are skipped
/// (logged) unless `opts.strict`, which fails on the first one.
pub fn find_documents(opts: &Opts) -> Result<WalkResult, TraversalError> {
    let root = check_root_and_canonicalize(&opts.folder)?;
    let iter = WalkDir::new(&root)
        .follow_links(opts.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e.path(), &opts.exclude))
        .map(to_outcome_walkdir);
    let result = run_walk_loop(iter, &root, opts)?;
    debug!(
        "Walk of {} found {} document(s), skipped {}",
        root.display(),
        result.documents.len(),
        result.skipped.len()
    );
    Ok(result)
}

/// Consume walk outcomes, keep matching files, and handle errors per `opts.strict`.
pub fn run_walk_loop<I>(iter: I, root: &Path, opts: &Opts) -> Result<WalkResult, TraversalError>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut result = WalkResult::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => {
                if has_extension(&path, &opts.extension) && !is_os_hidden_file(&path) {
                    result.documents.push(Document::new(path));
                }
            }
            WalkOutcome::Skip => {}
            WalkOutcome::Err { msg, path } => {
                if opts.strict {
                    return Err(TraversalError::Walk(msg));
                }
                let path = path.unwrap_or_else(|| root.to_path_buf());
                warn!("Cannot read {}: {}", path.display(), msg);
                result.skipped.push((path, msg));
            }
        }
    }
    Ok(result)
}
