//! Progress reporting: an atomic completed counter with an optional kdam bar on top.

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::utils::config::ProgressConsts;

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = ProgressConsts::UNIT
    )))
}

/// Documents attempted so far. Workers only ever call [`Progress::tick`].
pub struct Progress {
    completed: AtomicUsize,
    total: usize,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Counter only, nothing rendered.
    pub fn hidden(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            bar: None,
        }
    }

    /// Counter plus a bar on stderr.
    pub fn with_bar(total: usize, desc: &'static str) -> Self {
        let bar = create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic));
        if let Ok(mut b) = bar.lock() {
            let _ = b.refresh();
        }
        Self {
            completed: AtomicUsize::new(0),
            total,
            bar: Some(bar),
        }
    }

    /// One document attempted, whatever the outcome. Returns the new count.
    pub fn tick(&self) -> usize {
        let n = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        // try_lock: a contended bar skips the redraw; finish() catches it up.
        if let Some(bar) = &self.bar
            && let Ok(mut b) = bar.try_lock()
        {
            let _ = b.update_to(n.min(self.total));
        }
        n
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Bring the bar to the final count and end its line. Returns the final count.
    pub fn finish(&self) -> usize {
        let n = self.completed();
        if let Some(bar) = &self.bar
            && let Ok(mut b) = bar.lock()
        {
            let _ = b.update_to(n);
            let _ = b.refresh();
            eprintln!();
        }
        n
    }
}
