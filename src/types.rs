//! Public and internal types for the pdfsift API and pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::error::{ExtractionError, UsageError};
use crate::utils::config::Defaults;

/// One file to process. `name` is the base name and the identifier stored in the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub name: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// What a worker hands to the aggregator for one document.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Extracted and accepted by the mode; `item` goes to the sink.
    Accepted { document: Document, item: T },
    /// Extracted but the mode had nothing to do with it (e.g. no keyword match).
    Rejected(Document),
    /// Extraction failed; the document is skipped.
    Failed {
        document: Document,
        cause: ExtractionError,
    },
}

/// Counters owned by the aggregator.
///
/// `seen == extracted + failed` and `committed + sink_failures == accepted` hold once a run is drained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunTally {
    /// Outcomes received from workers.
    pub seen: usize,
    /// Documents whose text was extracted.
    pub extracted: usize,
    /// Documents whose extraction failed.
    pub failed: usize,
    /// Outcomes handed to the sink (matches in search mode, insert requests in index mode).
    pub accepted: usize,
    /// Sink operations that succeeded (rows inserted, matches recorded).
    pub committed: usize,
    /// Sink operations that failed (insert or copy errors).
    pub sink_failures: usize,
}

/// Where a per-document failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStage {
    Extraction,
    Sink,
}

/// A logged, non-fatal per-document failure.
#[derive(Clone, Debug)]
pub struct FailedDocument {
    pub name: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Result of one pipeline run, returned after the aggregator has drained.
pub struct PipelineReport<S> {
    pub tally: RunTally,
    /// Final progress count (documents attempted).
    pub completed: usize,
    pub total: usize,
    pub failures: Vec<FailedDocument>,
    pub cancelled: bool,
    pub elapsed: Duration,
    /// The sink, handed back so callers can read what it collected.
    pub sink: S,
}

/// All-or-any keyword test, evaluated on extracted text or turned into an index query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordPredicate {
    keywords: Vec<String>,
    lowered: Vec<String>,
    pub all: bool,
    pub exact: bool,
}

impl KeywordPredicate {
    /// Blank keywords are dropped; nothing left is a usage error. The rest are kept as given,
    /// surrounding spaces included.
    pub fn new<I, S>(keywords: I, all: bool, exact: bool) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .filter(|k| !k.trim().is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(UsageError::NoKeywords);
        }
        let lowered = keywords.iter().map(|k| k.to_lowercase()).collect();
        Ok(Self {
            keywords,
            lowered,
            all,
            exact,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub(crate) fn lowered(&self) -> &[String] {
        &self.lowered
    }
}

/// Options shared by the CLI and the library drivers.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Root folder to walk.
    pub folder: PathBuf,
    /// Max extractions in flight.
    pub threads: usize,
    /// Index database path.
    pub db_path: PathBuf,
    /// File extension (without dot), matched case-insensitively.
    pub extension: String,
    /// Converter program invoked per document.
    pub converter: String,
    /// Converter arguments; `{input}` is replaced with the document path.
    pub converter_args: Vec<String>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax).
    pub exclude: Vec<String>,
    /// Strict mode: fail on the first unreadable entry instead of skipping.
    pub strict: bool,
    pub verbose: bool,
    /// Render a progress bar.
    pub progress: bool,
    /// Skip the create-index confirmation.
    pub assume_yes: bool,
    /// Set by the Ctrl+C handler; workers stop taking documents once true.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(Defaults::FOLDER),
            threads: Defaults::THREADS,
            db_path: PathBuf::from(Defaults::DB_PATH),
            extension: Defaults::EXTENSION.to_string(),
            converter: Defaults::CONVERTER.to_string(),
            converter_args: Defaults::converter_args(),
            follow_links: false,
            exclude: Vec::new(),
            strict: false,
            verbose: false,
            progress: false,
            assume_yes: false,
            cancel: None,
        }
    }
}

impl Opts {
    /// Options rooted at `folder` with everything else defaulted (no progress bar).
    pub fn for_folder(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            ..Self::default()
        }
    }
}

/// How a driver run ended.
pub enum RunOutcome<S> {
    /// The folder held no matching documents; nothing was touched.
    NoDocuments,
    /// The user declined to create a new index.
    Declined,
    Completed(PipelineReport<S>),
}

impl<S> RunOutcome<S> {
    pub fn report(&self) -> Option<&PipelineReport<S>> {
        match self {
            RunOutcome::Completed(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_report(self) -> Option<PipelineReport<S>> {
        match self {
            RunOutcome::Completed(r) => Some(r),
            _ => None,
        }
    }
}
