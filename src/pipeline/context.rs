//! Pipeline tuning: worker count, admission capacity and channel sizes for one run.

use log::debug;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::error::UsageError;
use crate::utils::fd_limit::max_extractions_by_fd_limit;

/// Derived from the requested thread count, the document count and the FD limit.
///
/// Every field is at most `max(total, 1)`, so channel and permit buffers never outgrow the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    /// Worker threads spawned.
    pub num_workers: usize,
    /// Extractions allowed in flight (admission capacity). Equal to `num_workers`.
    pub max_in_flight: usize,
    /// Capacity of the worker → aggregator channel.
    pub outcome_cap: usize,
}

impl PipelineTuning {
    /// `threads` must be at least 1. Never spawns more workers than documents.
    pub fn new(threads: usize, total: usize) -> Result<Self, UsageError> {
        Self::with_fd_cap(threads, total, max_extractions_by_fd_limit())
    }

    pub fn with_fd_cap(
        threads: usize,
        total: usize,
        fd_cap: Option<usize>,
    ) -> Result<Self, UsageError> {
        if threads == 0 {
            return Err(UsageError::ZeroConcurrency);
        }
        let max_in_flight = match fd_cap {
            Some(cap) if cap < threads => {
                debug!("Capping threads {} -> {} (FD limit ~80%)", threads, cap);
                cap.max(1)
            }
            _ => threads,
        };
        let num_workers = max_in_flight.min(total.max(1));
        Ok(Self {
            num_workers,
            max_in_flight: num_workers,
            outcome_cap: num_workers,
        })
    }
}

/// Per-run settings for [`run_pipeline`](super::run_pipeline).
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    pub threads: usize,
    /// Render a progress bar with this description; `None` keeps the counter only.
    pub progress_desc: Option<&'static str>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl PipelineOpts {
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            progress_desc: None,
            cancel: None,
        }
    }
}
