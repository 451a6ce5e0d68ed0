//! Search modes: scan extracted text directly, or run one query against an existing index.

use anyhow::Result;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::db_ops::{open_existing_db, query_filenames};
use crate::engine::extract::Extractor;
use crate::engine::tools::ensure_dir;
use crate::pipeline::{
    MatchSink, PipelineOpts, ScanMode, Sink, find_documents, report_skipped_paths, run_pipeline,
};
use crate::utils::config::ProgressConsts;
use crate::{Document, FailedDocument, FailureStage, KeywordPredicate, Opts, RunOutcome};

/// Extract every document under `opts.folder` and keep those matching `predicate`.
///
/// `save_dir` is created before any worker starts (failure is fatal); each match is then copied
/// into it by the aggregator.
pub fn scan_dir(
    opts: &Opts,
    predicate: KeywordPredicate,
    save_dir: Option<&Path>,
    extractor: Arc<dyn Extractor>,
) -> Result<RunOutcome<MatchSink>> {
    let walk = find_documents(opts)?;
    report_skipped_paths(&walk.skipped, opts.verbose);
    if walk.documents.is_empty() {
        debug!("No documents under {}", opts.folder.display());
        return Ok(RunOutcome::NoDocuments);
    }
    if let Some(dir) = save_dir {
        ensure_dir(dir)?;
    }

    let pipeline_opts = PipelineOpts {
        threads: opts.threads,
        progress_desc: opts.progress.then_some(ProgressConsts::SCAN_DESC),
        cancel: opts.cancel.clone(),
    };
    let report = run_pipeline(
        walk.documents,
        extractor,
        ScanMode { predicate },
        MatchSink::new(save_dir.map(Path::to_path_buf)),
        &pipeline_opts,
    )?;
    Ok(RunOutcome::Completed(report))
}

/// Result of [`query_index`].
#[derive(Debug, Default)]
pub struct QueryResult {
    /// The MATCH expression that was run.
    pub query: String,
    /// Matching file names as stored (duplicates kept).
    pub matched: Vec<String>,
    /// Distinct files copied into the save folder.
    pub copied: usize,
    pub failures: Vec<FailedDocument>,
}

/// Run `predicate` as a single FTS5 query against the index at `opts.db_path`. No extraction happens.
///
/// With `save_dir`, each matched name is looked up among the documents under `opts.folder` and
/// copied; names not found there are reported as failures.
pub fn query_index(
    opts: &Opts,
    predicate: &KeywordPredicate,
    save_dir: Option<&Path>,
) -> Result<QueryResult> {
    let conn = open_existing_db(&opts.db_path)?;
    let query = predicate.to_fts_query();
    debug!("FTS query: {}", query);
    let matched = query_filenames(&conn, &query)?;

    let mut result = QueryResult {
        query,
        matched,
        ..QueryResult::default()
    };
    if let Some(dir) = save_dir
        && !result.matched.is_empty()
    {
        ensure_dir(dir)?;
        let located = locate_documents(opts)?;
        let mut sink = MatchSink::new(Some(dir.to_path_buf())).quiet();
        let mut copied_names = HashSet::new();
        for name in &result.matched {
            if !copied_names.insert(name.as_str()) {
                continue;
            }
            let path = located
                .get(name)
                .cloned()
                .unwrap_or_else(|| opts.folder.join(name));
            let document = Document {
                path,
                name: name.clone(),
            };
            match sink.accept(&document, ()) {
                Ok(()) => result.copied += 1,
                Err(e) => {
                    warn!("Failed to copy {}: {:#}", name, e);
                    result.failures.push(FailedDocument {
                        name: name.clone(),
                        stage: FailureStage::Sink,
                        message: format!("{:#}", e),
                    });
                }
            }
        }
    }
    Ok(result)
}

/// Base name → path for documents under `opts.folder`. The first path wins for repeated names.
fn locate_documents(opts: &Opts) -> Result<HashMap<String, PathBuf>> {
    let walk = find_documents(opts)?;
    report_skipped_paths(&walk.skipped, opts.verbose);
    let mut map = HashMap::with_capacity(walk.documents.len());
    for doc in walk.documents {
        map.entry(doc.name).or_insert(doc.path);
    }
    Ok(map)
}
