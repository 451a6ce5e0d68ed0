use colored::Colorize;
use std::path::PathBuf;

use crate::{FailedDocument, FailureStage};

/// Warn once about entries the walk could not read; list them when verbose.
pub fn report_skipped_paths(skipped: &[(PathBuf, String)], verbose: bool) {
    if skipped.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped.len()
    );
    if verbose {
        for (p, msg) in skipped {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}

/// Summarize per-document failures after a run; list them when verbose.
pub fn report_failures(failures: &[FailedDocument], verbose: bool) {
    if failures.is_empty() {
        return;
    }
    let extraction = failures
        .iter()
        .filter(|f| f.stage == FailureStage::Extraction)
        .count();
    let sink = failures.len() - extraction;
    log::warn!(
        "{} document(s) failed: {} extraction, {} output",
        failures.len(),
        extraction,
        sink
    );
    if verbose {
        for f in failures {
            let stage = match f.stage {
                FailureStage::Extraction => "extract".yellow(),
                FailureStage::Sink => "output".red(),
            };
            eprintln!("  {} {}: {}", stage, f.name, f.message);
        }
    }
}
