use anyhow::Result;
use crossbeam_channel::bounded;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

use crate::engine::extract::Extractor;
use crate::engine::progress::Progress;
use crate::{Document, Outcome, PipelineReport};

use super::aggregator::{Aggregated, Sink, spawn_aggregator};
use super::context::{PipelineOpts, PipelineTuning};
use super::workers::{Admission, Mode, WorkerShared, spawn_extraction_workers};

/// Run every document through extraction and `mode`, feeding outcomes to `sink` on one aggregator thread.
///
/// Order of shutdown: workers are joined, then the last outcome sender is dropped, then the
/// aggregator is joined (it drains the channel first). The tally is read only after that.
pub fn run_pipeline<M, S>(
    documents: Vec<Document>,
    extractor: Arc<dyn Extractor>,
    mode: M,
    sink: S,
    opts: &PipelineOpts,
) -> Result<PipelineReport<S>>
where
    M: Mode,
    S: Sink<M::Item> + 'static,
{
    let start = Instant::now();
    let total = documents.len();
    let tuning = PipelineTuning::new(opts.threads, total)?;
    debug!("Pipeline tuning for {} document(s): {:?}", total, tuning);

    let progress = Arc::new(match opts.progress_desc {
        Some(desc) => Progress::with_bar(total, desc),
        None => Progress::hidden(total),
    });

    // Every document is queued up front; the queue is closed before workers start.
    let (doc_tx, doc_rx) = bounded::<Document>(total.max(1));
    for document in documents {
        doc_tx.send(document)?;
    }
    drop(doc_tx);

    let (outcome_tx, outcome_rx) = bounded::<Outcome<M::Item>>(tuning.outcome_cap);
    let aggregator = spawn_aggregator(outcome_rx, sink);

    let shared = WorkerShared {
        extractor,
        mode: Arc::new(mode),
        admission: Admission::new(tuning.max_in_flight),
        progress: Arc::clone(&progress),
        cancel: opts.cancel.clone(),
    };
    let workers = spawn_extraction_workers(doc_rx, &outcome_tx, &shared, tuning.num_workers);
    drop(shared);

    let mut worker_panicked = false;
    for h in workers {
        worker_panicked |= h.join().is_err();
    }
    // All workers are done submitting; closing the channel lets the aggregator finish its drain.
    drop(outcome_tx);
    let Aggregated {
        tally,
        failures,
        sink,
    } = aggregator
        .join()
        .map_err(|_| anyhow::anyhow!("aggregator thread panicked"))?;
    if worker_panicked {
        anyhow::bail!("extraction worker panicked");
    }

    let completed = progress.finish();
    let cancelled = completed < total;
    debug!(
        "Pipeline done: {}/{} attempted, tally {:?}",
        completed, total, tally
    );

    Ok(PipelineReport {
        tally,
        completed,
        total,
        failures,
        cancelled,
        elapsed: start.elapsed(),
        sink,
    })
}
