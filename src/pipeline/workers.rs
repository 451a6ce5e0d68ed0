//! Extraction workers and the admission gate that bounds extractions in flight.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::extract::Extractor;
use crate::engine::progress::Progress;
use crate::{Document, KeywordPredicate, Outcome};

/// Decides what a successfully extracted document turns into.
pub trait Mode: Send + Sync + 'static {
    type Item: Send + 'static;

    /// `Some(item)` sends the document to the sink; `None` counts it as extracted but rejected.
    fn classify(&self, document: &Document, content: String) -> Option<Self::Item>;
}

/// Index mode: every extracted text becomes an insert request.
pub struct IndexMode;

impl Mode for IndexMode {
    type Item = String;

    fn classify(&self, _document: &Document, content: String) -> Option<String> {
        Some(content)
    }
}

/// Search mode: the text is tested here, in the worker; only matches reach the aggregator's sink.
pub struct ScanMode {
    pub predicate: KeywordPredicate,
}

impl Mode for ScanMode {
    type Item = ();

    fn classify(&self, _document: &Document, content: String) -> Option<()> {
        self.predicate.matches(&content).then_some(())
    }
}

/// Counting semaphore built on a bounded channel: a send takes a slot, a receive frees one.
///
/// The pipeline spawns no more workers than permits, so in a run it is a guard that backs up
/// the worker count. It blocks only when callers share it across more threads than its capacity.
#[derive(Clone)]
pub struct Admission {
    slots_tx: Sender<()>,
    slots_rx: Receiver<()>,
}

/// Held while one extraction runs; dropping it frees the slot.
pub struct Permit<'a> {
    admission: &'a Admission,
}

impl Admission {
    pub fn new(capacity: usize) -> Self {
        let (slots_tx, slots_rx) = bounded(capacity.max(1));
        Self { slots_tx, slots_rx }
    }

    /// Block until a slot is free.
    pub fn acquire(&self) -> Permit<'_> {
        // Both ends live in self, so send cannot fail on disconnect.
        let _ = self.slots_tx.send(());
        Permit { admission: self }
    }

    pub fn capacity(&self) -> usize {
        self.slots_tx.capacity().unwrap_or(1)
    }

    /// Slots currently taken.
    pub fn in_use(&self) -> usize {
        self.slots_tx.len()
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.admission.slots_rx.try_recv();
    }
}

/// Shared by every worker of one run.
pub struct WorkerShared<M> {
    pub extractor: Arc<dyn Extractor>,
    pub mode: Arc<M>,
    pub admission: Admission,
    pub progress: Arc<Progress>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl<M> Clone for WorkerShared<M> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            mode: Arc::clone(&self.mode),
            admission: self.admission.clone(),
            progress: Arc::clone(&self.progress),
            cancel: self.cancel.clone(),
        }
    }
}

impl<M> WorkerShared<M> {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }
}

/// Extract one document and classify it. The permit covers extraction only.
pub fn process_document<M: Mode>(shared: &WorkerShared<M>, document: Document) -> Outcome<M::Item> {
    let extracted = {
        let _permit = shared.admission.acquire();
        shared.extractor.extract(&document.path)
    };
    match extracted {
        Ok(content) => match shared.mode.classify(&document, content) {
            Some(item) => Outcome::Accepted { document, item },
            None => Outcome::Rejected(document),
        },
        Err(cause) => {
            warn!("Failed to extract {}: {}", document.name, cause);
            Outcome::Failed { document, cause }
        }
    }
}

/// Single worker: take documents until the queue is empty or the run is cancelled.
fn extraction_worker_loop<M: Mode>(
    doc_rx: Receiver<Document>,
    outcome_tx: Sender<Outcome<M::Item>>,
    shared: WorkerShared<M>,
) {
    while let Ok(document) = doc_rx.recv() {
        if shared.cancelled() {
            debug!("worker: cancel requested, leaving queue");
            break;
        }
        let outcome = process_document(&shared, document);
        let sent = outcome_tx.send(outcome).is_ok();
        shared.progress.tick();
        if !sent {
            warn!("Aggregator is gone; worker stopping");
            break;
        }
    }
}

/// Spawn `num_workers` extraction workers. Each holds its own clone of `outcome_tx`, dropped when it exits.
pub fn spawn_extraction_workers<M: Mode>(
    doc_rx: Receiver<Document>,
    outcome_tx: &Sender<Outcome<M::Item>>,
    shared: &WorkerShared<M>,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let doc_rx = doc_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let shared = shared.clone();
            thread::spawn(move || extraction_worker_loop(doc_rx, outcome_tx, shared))
        })
        .collect()
}
