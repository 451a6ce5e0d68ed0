//! Pipeline components: traversal, extraction workers, aggregator, driver.

pub mod aggregator;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use aggregator::{Aggregated, MatchSink, Sink, aggregate, spawn_aggregator};
pub use context::{PipelineOpts, PipelineTuning};
pub use error_handler::{report_failures, report_skipped_paths};
pub use orchestrator::run_pipeline;
pub use walk::{WalkOutcome, WalkResult, find_documents, run_walk_loop, to_outcome_walkdir};
pub use workers::{
    Admission, IndexMode, Mode, Permit, ScanMode, WorkerShared, process_document,
    spawn_extraction_workers,
};
