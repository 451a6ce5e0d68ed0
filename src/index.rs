//! Index mode: extract every document and append its text to the FTS5 store.

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use crate::engine::db_ops::{IndexSink, db_exists, open_db};
use crate::engine::extract::Extractor;
use crate::pipeline::{
    IndexMode, PipelineOpts, find_documents, report_skipped_paths, run_pipeline,
};
use crate::utils::config::ProgressConsts;
use crate::utils::confirm::Confirm;
use crate::{Opts, RunOutcome};

/// Prompt shown before a new index file is created.
pub fn create_prompt(opts: &Opts) -> String {
    format!(
        "Database '{}' not found. Do you want to create it?",
        opts.db_path.display()
    )
}

/// Index `opts.folder` into the store at `opts.db_path`.
///
/// The walk runs first so a bad folder fails before anything else. An empty folder returns
/// [`RunOutcome::NoDocuments`] without opening the store. A missing store is created only after
/// `confirm` agrees (or `opts.assume_yes`). Rows are appended: indexing the same folder twice
/// stores every document twice.
pub fn index_dir(
    opts: &Opts,
    extractor: Arc<dyn Extractor>,
    confirm: &dyn Confirm,
) -> Result<RunOutcome<IndexSink>> {
    let walk = find_documents(opts)?;
    report_skipped_paths(&walk.skipped, opts.verbose);
    if walk.documents.is_empty() {
        debug!("No documents under {}", opts.folder.display());
        return Ok(RunOutcome::NoDocuments);
    }

    if !db_exists(&opts.db_path) && !opts.assume_yes && !confirm.confirm(&create_prompt(opts))? {
        return Ok(RunOutcome::Declined);
    }
    let conn = open_db(&opts.db_path)?;

    info!(
        "Found {} document(s) to index in {}",
        walk.documents.len(),
        opts.folder.display()
    );
    let pipeline_opts = PipelineOpts {
        threads: opts.threads,
        progress_desc: opts.progress.then_some(ProgressConsts::INDEX_DESC),
        cancel: opts.cancel.clone(),
    };
    let report = run_pipeline(
        walk.documents,
        extractor,
        IndexMode,
        IndexSink::new(conn),
        &pipeline_opts,
    )?;
    Ok(RunOutcome::Completed(report))
}
