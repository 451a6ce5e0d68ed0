//! CLI command handlers: build options (defaults → .pdfsift.toml → flags), run a mode, print the summary.

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::engine::arg_parser::{Cli, Commands, CommonArgs, KeywordArgs};
use crate::engine::extract::{CommandExtractor, Extractor};
use crate::index::index_dir;
use crate::pipeline::report_failures;
use crate::search::{query_index, scan_dir};
use crate::utils::confirm::StdinConfirm;
use crate::utils::pdfsift_toml::{apply_file_to_opts, load_pdfsift_toml};
use crate::utils::setup_logging;
use crate::{KeywordPredicate, Opts, PipelineReport, RunOutcome};

/// Defaults, then the config file in the working directory.
fn base_opts() -> Opts {
    let mut opts = Opts {
        progress: true,
        ..Opts::default()
    };
    if let Ok(cwd) = std::env::current_dir()
        && let Some(file) = load_pdfsift_toml(&cwd)
    {
        apply_file_to_opts(&file, &mut opts);
    }
    opts
}

fn apply_common_args(common: &CommonArgs, opts: &mut Opts) {
    if let Some(ref folder) = common.folder {
        opts.folder = folder.clone();
    }
    if let Some(threads) = common.threads {
        opts.threads = threads;
    }
    if let Some(ref ext) = common.ext {
        opts.extension = ext.clone();
    }
    if !common.exclude.is_empty() {
        opts.exclude = common.exclude.clone();
    }
    opts.follow_links |= common.follow_links;
    opts.strict |= common.strict;
    opts.verbose |= common.verbose;
    if common.quiet {
        opts.progress = false;
    }
}

/// Ctrl+C sets the returned flag; workers stop taking new documents and the run drains.
fn install_cancel_handler() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
        warn!("Cancel requested; finishing documents in flight...");
    })
    .context("set Ctrl+C handler")?;
    Ok(cancel)
}

fn predicate_from(search: &KeywordArgs) -> Result<KeywordPredicate> {
    Ok(KeywordPredicate::new(
        &search.keywords,
        search.all,
        search.exact,
    )?)
}

fn print_elapsed(start: Instant) {
    println!(
        "{} {:.2} seconds",
        "Total time:".dimmed(),
        start.elapsed().as_secs_f64()
    );
}

fn print_no_documents(opts: &Opts) {
    println!(
        "No {} files found in {}.",
        opts.extension.to_uppercase(),
        opts.folder.display()
    );
}

/// After the summary: a cancelled run is an error.
fn check_cancelled<S>(report: &PipelineReport<S>) -> Result<()> {
    if report.cancelled {
        anyhow::bail!(
            "Run cancelled by user; {} of {} document(s) processed",
            report.completed,
            report.total
        );
    }
    Ok(())
}

/// Parse-free entry point for the binary: dispatch on the subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let start = Instant::now();
    let mut opts = base_opts();
    match &cli.command {
        Commands::Index { common, db, yes } => {
            apply_common_args(common, &mut opts);
            if let Some(db) = db {
                opts.db_path = db.clone();
            }
            opts.assume_yes |= *yes;
            setup_logging(opts.verbose);
            opts.cancel = Some(install_cancel_handler()?);
            handle_index(&opts, start)
        }
        Commands::Scan { common, search } => {
            apply_common_args(common, &mut opts);
            setup_logging(opts.verbose);
            let predicate = predicate_from(search)?;
            opts.cancel = Some(install_cancel_handler()?);
            handle_scan(&opts, predicate, search.save.as_deref(), start)
        }
        Commands::Query {
            db,
            folder,
            verbose,
            search,
        } => {
            if let Some(db) = db {
                opts.db_path = db.clone();
            }
            if let Some(folder) = folder {
                opts.folder = folder.clone();
            }
            opts.verbose |= *verbose;
            setup_logging(opts.verbose);
            let predicate = predicate_from(search)?;
            handle_query(&opts, &predicate, search.save.as_deref(), start)
        }
    }
}

fn handle_index(opts: &Opts, start: Instant) -> Result<()> {
    debug!("Options: {:#?}", opts);
    let extractor: Arc<dyn Extractor> = Arc::new(CommandExtractor::from_opts(opts));
    match index_dir(opts, extractor, &StdinConfirm)? {
        RunOutcome::NoDocuments => print_no_documents(opts),
        RunOutcome::Declined => println!("Exiting."),
        RunOutcome::Completed(report) => {
            report_failures(&report.failures, opts.verbose);
            println!(
                "\n{} Indexed {} of {} document(s) into {}.",
                "Done!".green().bold(),
                report.tally.committed,
                report.total,
                opts.db_path.display()
            );
            print_elapsed(start);
            check_cancelled(&report)?;
        }
    }
    Ok(())
}

fn handle_scan(
    opts: &Opts,
    predicate: KeywordPredicate,
    save: Option<&Path>,
    start: Instant,
) -> Result<()> {
    debug!("Options: {:#?}", opts);
    println!(
        "Searching {} for keyword(s): {}",
        opts.folder.display(),
        predicate.keywords().join(", ")
    );
    let extractor: Arc<dyn Extractor> = Arc::new(CommandExtractor::from_opts(opts));
    match scan_dir(opts, predicate, save, extractor)? {
        RunOutcome::NoDocuments | RunOutcome::Declined => print_no_documents(opts),
        RunOutcome::Completed(report) => {
            report_failures(&report.failures, opts.verbose);
            println!(
                "\n{} Found {} matching file(s).",
                "Done!".green().bold(),
                report.tally.accepted
            );
            print_elapsed(start);
            check_cancelled(&report)?;
        }
    }
    Ok(())
}

fn handle_query(
    opts: &Opts,
    predicate: &KeywordPredicate,
    save: Option<&Path>,
    start: Instant,
) -> Result<()> {
    let result = query_index(opts, predicate, save)?;
    println!("\nSearch Results for [{}]:", result.query);
    if result.matched.is_empty() {
        println!("{}", "No matching files found.".yellow());
    }
    for name in &result.matched {
        println!("{} {}", "✔".green(), name);
    }
    report_failures(&result.failures, opts.verbose);
    if save.is_some() {
        println!("Copied {} file(s).", result.copied);
    }
    println!(
        "\n{} Found {} matching file(s).",
        "Done!".green().bold(),
        result.matched.len()
    );
    print_elapsed(start);
    Ok(())
}
