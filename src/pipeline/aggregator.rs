//! Aggregator: the single consumer of worker outcomes. Owns the tally and applies side effects one at a time.

use anyhow::Result;
use colored::Colorize;
use crossbeam_channel::Receiver;
use log::{debug, warn};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::engine::tools::copy_into;
use crate::{Document, FailedDocument, FailureStage, Outcome, RunTally};

/// Side effect applied to each accepted outcome. Only ever called from the aggregator thread.
pub trait Sink<T>: Send {
    fn accept(&mut self, document: &Document, item: T) -> Result<()>;

    /// Called once after the channel is closed and drained.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// What the aggregator thread hands back on join.
pub struct Aggregated<S> {
    pub tally: RunTally,
    pub failures: Vec<FailedDocument>,
    pub sink: S,
}

/// Receive until every sender is gone, applying outcomes in arrival order.
pub fn aggregate<T, S>(outcome_rx: Receiver<Outcome<T>>, mut sink: S) -> Aggregated<S>
where
    S: Sink<T>,
{
    let mut tally = RunTally::default();
    let mut failures = Vec::new();

    while let Ok(outcome) = outcome_rx.recv() {
        tally.seen += 1;
        match outcome {
            Outcome::Accepted { document, item } => {
                tally.extracted += 1;
                tally.accepted += 1;
                match sink.accept(&document, item) {
                    Ok(()) => tally.committed += 1,
                    Err(e) => {
                        warn!("Failed to process {}: {:#}", document.name, e);
                        tally.sink_failures += 1;
                        failures.push(FailedDocument {
                            name: document.name,
                            stage: FailureStage::Sink,
                            message: format!("{:#}", e),
                        });
                    }
                }
            }
            Outcome::Rejected(_) => tally.extracted += 1,
            Outcome::Failed { document, cause } => {
                tally.failed += 1;
                failures.push(FailedDocument {
                    name: document.name,
                    stage: FailureStage::Extraction,
                    message: cause.to_string(),
                });
            }
        }
    }
    debug!("aggregator: channel closed, {} outcome(s) drained", tally.seen);

    if let Err(e) = sink.finish() {
        warn!("Failed to finalize output: {:#}", e);
    }
    Aggregated {
        tally,
        failures,
        sink,
    }
}

/// Run [`aggregate`] on its own thread.
pub fn spawn_aggregator<T, S>(outcome_rx: Receiver<Outcome<T>>, sink: S) -> JoinHandle<Aggregated<S>>
where
    T: Send + 'static,
    S: Sink<T> + 'static,
{
    thread::spawn(move || aggregate(outcome_rx, sink))
}

/// Search-mode sink: records each match, announces it, and optionally copies the file.
pub struct MatchSink {
    save_dir: Option<PathBuf>,
    announce: bool,
    matched: Vec<String>,
}

impl MatchSink {
    /// `save_dir` must already exist; the driver creates it before the run.
    pub fn new(save_dir: Option<PathBuf>) -> Self {
        Self {
            save_dir,
            announce: true,
            matched: Vec::new(),
        }
    }

    /// Do not print `Found in:` lines.
    pub fn quiet(mut self) -> Self {
        self.announce = false;
        self
    }

    /// Matched names in the order they arrived.
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    pub fn into_matched(self) -> Vec<String> {
        self.matched
    }
}

impl Sink<()> for MatchSink {
    fn accept(&mut self, document: &Document, _item: ()) -> Result<()> {
        self.matched.push(document.name.clone());
        if self.announce {
            println!("{} {}", "Found in:".green(), document.name);
        }
        if let Some(dir) = &self.save_dir {
            copy_into(&document.path, dir, &document.name)?;
        }
        Ok(())
    }
}
