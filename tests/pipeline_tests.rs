//! Pipeline tests: exactly-once processing, bounded admission, failure isolation, drivers.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pdfsift::engine::{document_count, open_existing_db, query_filenames};
use pdfsift::pipeline::{IndexMode, MatchSink, PipelineOpts, ScanMode, Sink, run_pipeline};
use pdfsift::utils::AssumeYes;
use pdfsift::{
    Document, ExtractionError, Extractor, FailureStage, KeywordPredicate, Opts, RunOutcome,
    TraversalError, index_dir, query_index, scan_dir,
};

/// Records every accepted document; used where no store is needed.
#[derive(Default)]
struct CollectSink {
    names: Vec<String>,
}

impl Sink<String> for CollectSink {
    fn accept(&mut self, document: &Document, _item: String) -> anyhow::Result<()> {
        self.names.push(document.name.clone());
        Ok(())
    }
}

fn docs(n: usize) -> Vec<Document> {
    (0..n).map(|i| Document::new(format!("/virtual/doc{:03}.pdf", i))).collect()
}

fn echo_name() -> Arc<dyn Extractor> {
    Arc::new(|path: &Path| -> Result<String, ExtractionError> {
        Ok(path.to_string_lossy().into_owned())
    })
}

fn read_file() -> Arc<dyn Extractor> {
    Arc::new(|path: &Path| -> Result<String, ExtractionError> {
        let text = fs::read_to_string(path).map_err(|e| ExtractionError::Other(e.to_string()))?;
        if text.starts_with("MALFORMED") {
            return Err(ExtractionError::Other("malformed document".to_string()));
        }
        Ok(text)
    })
}

fn delay_for(path: &Path) -> Duration {
    let mut h = DefaultHasher::new();
    path.hash(&mut h);
    Duration::from_millis(h.finish() % 7)
}

fn write_docs(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

fn opts_for(folder: &Path, db: &Path, threads: usize) -> Opts {
    Opts {
        threads,
        db_path: db.to_path_buf(),
        assume_yes: true,
        ..Opts::for_folder(folder)
    }
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

// --- run_pipeline ---

#[test]
fn test_every_document_processed_exactly_once() {
    let total = 12;
    for threads in 1..=total {
        let report = run_pipeline(
            docs(total),
            echo_name(),
            IndexMode,
            CollectSink::default(),
            &PipelineOpts::new(threads),
        )
        .unwrap();
        assert_eq!(report.total, total);
        assert_eq!(report.completed, total, "threads={}", threads);
        assert!(!report.cancelled);
        assert_eq!(report.tally.seen, total);
        assert_eq!(report.tally.committed, total);

        let names = sorted(report.sink.names);
        let expected: Vec<String> = docs(total).into_iter().map(|d| d.name).collect();
        assert_eq!(names, expected, "threads={}", threads);
    }
}

#[test]
fn test_extractions_in_flight_never_exceed_threads() {
    let threads = 3;
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (c, p) = (Arc::clone(&current), Arc::clone(&peak));
    let extractor: Arc<dyn Extractor> =
        Arc::new(move |path: &Path| -> Result<String, ExtractionError> {
            let now = c.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            c.fetch_sub(1, Ordering::SeqCst);
            Ok(path.display().to_string())
        });

    let report = run_pipeline(
        docs(30),
        extractor,
        IndexMode,
        CollectSink::default(),
        &PipelineOpts::new(threads),
    )
    .unwrap();
    assert_eq!(report.completed, 30);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= threads, "peak {}", peak);
    assert_eq!(current.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_extraction_does_not_stop_run() {
    let extractor: Arc<dyn Extractor> =
        Arc::new(|path: &Path| -> Result<String, ExtractionError> {
            if path.ends_with("doc002.pdf") {
                Err(ExtractionError::Other("malformed document".to_string()))
            } else {
                Ok("text".to_string())
            }
        });
    let report = run_pipeline(
        docs(5),
        extractor,
        IndexMode,
        CollectSink::default(),
        &PipelineOpts::new(2),
    )
    .unwrap();

    assert_eq!(report.completed, 5);
    assert_eq!(report.tally.seen, 5);
    assert_eq!(report.tally.extracted, 4);
    assert_eq!(report.tally.failed, 1);
    assert_eq!(report.tally.committed, 4);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "doc002.pdf");
    assert_eq!(report.failures[0].stage, FailureStage::Extraction);
    assert!(!report.sink.names.contains(&"doc002.pdf".to_string()));
}

#[test]
fn test_scan_mode_only_matches_reach_sink() {
    let extractor: Arc<dyn Extractor> =
        Arc::new(|path: &Path| -> Result<String, ExtractionError> {
            let name = path.file_name().unwrap().to_string_lossy();
            Ok(if name.ends_with("1.pdf") {
                "Annual REPORT".to_string()
            } else {
                "nothing".to_string()
            })
        });
    let predicate = KeywordPredicate::new(["report"], false, false).unwrap();
    let report = run_pipeline(
        docs(12),
        extractor,
        ScanMode { predicate },
        MatchSink::new(None).quiet(),
        &PipelineOpts::new(4),
    )
    .unwrap();

    assert_eq!(report.tally.extracted, 12);
    assert_eq!(report.tally.accepted, 2);
    assert_eq!(
        sorted(report.sink.into_matched()),
        vec!["doc001.pdf".to_string(), "doc011.pdf".to_string()]
    );
}

#[test]
fn test_randomized_delays_keep_counts_consistent() {
    let extractor: Arc<dyn Extractor> =
        Arc::new(|path: &Path| -> Result<String, ExtractionError> {
            thread::sleep(delay_for(path));
            if delay_for(path).as_millis() == 0 {
                return Err(ExtractionError::Other("unreadable".to_string()));
            }
            Ok(String::new())
        });
    let total = 60;
    let expected_failures = docs(total)
        .iter()
        .filter(|d| delay_for(&d.path).as_millis() == 0)
        .count();

    let report = run_pipeline(
        docs(total),
        extractor,
        IndexMode,
        CollectSink::default(),
        &PipelineOpts::new(6),
    )
    .unwrap();
    assert_eq!(report.completed, total);
    assert_eq!(report.tally.seen, total);
    assert_eq!(report.tally.failed, expected_failures);
    assert_eq!(report.tally.extracted + report.tally.failed, total);
    assert_eq!(report.tally.committed, report.tally.accepted);
    assert_eq!(report.sink.names.len(), total - expected_failures);
}

#[test]
fn test_cancel_before_start_processes_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let extractor: Arc<dyn Extractor> =
        Arc::new(move |_: &Path| -> Result<String, ExtractionError> {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(String::new())
        });
    let opts = PipelineOpts {
        cancel: Some(Arc::new(AtomicBool::new(true))),
        ..PipelineOpts::new(4)
    };
    let report = run_pipeline(docs(10), extractor, IndexMode, CollectSink::default(), &opts)
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.completed, 0);
    assert_eq!(report.tally.seen, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancel_mid_run_drains_in_flight_outcomes() {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let extractor: Arc<dyn Extractor> =
        Arc::new(move |_: &Path| -> Result<String, ExtractionError> {
            flag.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            Ok(String::new())
        });
    let opts = PipelineOpts {
        cancel: Some(cancel),
        ..PipelineOpts::new(2)
    };
    let report = run_pipeline(docs(50), extractor, IndexMode, CollectSink::default(), &opts)
        .unwrap();

    assert!(report.cancelled);
    assert!(report.completed >= 1 && report.completed <= 2);
    // Every document a worker finished was counted by the aggregator.
    assert_eq!(report.tally.seen, report.completed);
    assert_eq!(report.sink.names.len(), report.completed);
}

#[test]
fn test_huge_thread_count_runs_with_one_worker_per_document() {
    let report = run_pipeline(
        docs(3),
        echo_name(),
        IndexMode,
        CollectSink::default(),
        &PipelineOpts::new(usize::MAX),
    )
    .unwrap();
    assert_eq!(report.completed, 3);
    assert_eq!(report.tally.committed, 3);
}

#[test]
fn test_zero_threads_is_error() {
    let result = run_pipeline(
        docs(3),
        echo_name(),
        IndexMode,
        CollectSink::default(),
        &PipelineOpts::new(0),
    );
    assert!(result.is_err());
}

// --- index_dir ---

#[test]
fn test_index_dir_then_query() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(
        &folder,
        &[
            ("a.pdf", "net income rose in 2023"),
            ("sub/b.PDF", "board minutes 2022"),
            ("c.pdf", "MALFORMED bytes"),
            ("notes.txt", "net income"),
        ],
    );
    let db = dir.path().join("index.db");
    let opts = opts_for(&folder, &db, 4);

    let report = index_dir(&opts, read_file(), &AssumeYes)
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.tally.committed, 2);
    assert_eq!(report.tally.failed, 1);

    let conn = open_existing_db(&db).unwrap();
    assert_eq!(document_count(&conn), Some(2));
    assert_eq!(query_filenames(&conn, "income").unwrap(), vec!["a.pdf"]);
    assert_eq!(query_filenames(&conn, "board").unwrap(), vec!["b.PDF"]);
}

#[test]
fn test_index_twice_duplicates_rows() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(&folder, &[("a.pdf", "invoice"), ("b.pdf", "receipt")]);
    let db = dir.path().join("index.db");
    let opts = opts_for(&folder, &db, 2);

    index_dir(&opts, read_file(), &AssumeYes).unwrap();
    index_dir(&opts, read_file(), &AssumeYes).unwrap();

    let conn = open_existing_db(&db).unwrap();
    assert_eq!(document_count(&conn), Some(4));
    assert_eq!(query_filenames(&conn, "invoice").unwrap().len(), 2);
}

#[test]
fn test_index_empty_folder_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(&folder, &[("readme.txt", "not a pdf")]);
    let db = dir.path().join("index.db");
    let opts = opts_for(&folder, &db, 2);

    let outcome = index_dir(&opts, read_file(), &AssumeYes).unwrap();
    assert!(matches!(outcome, RunOutcome::NoDocuments));
    assert!(!db.exists());
}

#[test]
fn test_index_declined_creates_no_store() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(&folder, &[("a.pdf", "text")]);
    let db = dir.path().join("index.db");
    let opts = Opts {
        assume_yes: false,
        ..opts_for(&folder, &db, 2)
    };

    let asked = Mutex::new(Vec::<String>::new());
    let decline = |prompt: &str| {
        asked.lock().unwrap().push(prompt.to_string());
        false
    };
    let outcome = index_dir(&opts, read_file(), &decline).unwrap();
    assert!(matches!(outcome, RunOutcome::Declined));
    assert!(!db.exists());
    assert_eq!(asked.lock().unwrap().len(), 1);
}

#[test]
fn test_index_existing_store_does_not_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(&folder, &[("a.pdf", "text")]);
    let db = dir.path().join("index.db");
    index_dir(&opts_for(&folder, &db, 1), read_file(), &AssumeYes).unwrap();

    let opts = Opts {
        assume_yes: false,
        ..opts_for(&folder, &db, 1)
    };
    let never = |_: &str| -> bool { panic!("should not prompt for an existing store") };
    let outcome = index_dir(&opts, read_file(), &never).unwrap();
    assert!(outcome.report().is_some());
}

#[test]
fn test_index_missing_root_is_traversal_error() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("does-not-exist");
    let db = dir.path().join("index.db");
    let err = index_dir(&opts_for(&folder, &db, 2), read_file(), &AssumeYes)
        .err()
        .unwrap();
    assert!(matches!(
        err.downcast_ref::<TraversalError>(),
        Some(TraversalError::RootNotFound(_))
    ));
    assert!(!db.exists());
}

#[test]
fn test_walk_honors_excludes_and_hidden_files() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(
        &folder,
        &[
            ("keep.pdf", "alpha"),
            ("drafts/skip.pdf", "alpha"),
            ("._keep.pdf", "alpha"),
        ],
    );
    let opts = Opts {
        exclude: vec!["drafts".to_string()],
        ..opts_for(&folder, &dir.path().join("index.db"), 2)
    };
    let report = index_dir(&opts, read_file(), &AssumeYes)
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(report.total, 1);
}

// --- scan_dir / query_index ---

#[test]
fn test_scan_dir_copies_matches() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(
        &folder,
        &[
            ("a.pdf", "Total NET income"),
            ("b.pdf", "gross margin"),
            ("deep/c.pdf", "net income and net loss"),
        ],
    );
    let save = dir.path().join("out").join("matches");
    let opts = Opts {
        threads: 3,
        ..Opts::for_folder(&folder)
    };
    let predicate = KeywordPredicate::new(["net income"], false, true).unwrap();

    let report = scan_dir(&opts, predicate, Some(&save), read_file())
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(report.tally.accepted, 2);
    assert_eq!(report.tally.committed, 2);
    assert_eq!(
        sorted(report.sink.into_matched()),
        vec!["a.pdf".to_string(), "c.pdf".to_string()]
    );
    assert!(save.join("a.pdf").is_file());
    assert!(save.join("c.pdf").is_file());
    assert!(!save.join("b.pdf").exists());
}

#[test]
fn test_scan_dir_malformed_document_never_matches() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(
        &folder,
        &[
            ("a.pdf", "net income rose"),
            ("net_income.pdf", "MALFORMED net income"),
            ("z.pdf", "NET INCOME fell"),
        ],
    );
    let save = dir.path().join("saved");
    let opts = Opts {
        threads: 2,
        ..Opts::for_folder(&folder)
    };
    let predicate = KeywordPredicate::new(["net income"], false, false).unwrap();

    let report = scan_dir(&opts, predicate, Some(&save), read_file())
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(report.completed, 3);
    assert_eq!(report.tally.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "net_income.pdf");
    assert_eq!(report.failures[0].stage, FailureStage::Extraction);
    assert_eq!(
        sorted(report.sink.into_matched()),
        vec!["a.pdf".to_string(), "z.pdf".to_string()]
    );
    assert!(save.join("a.pdf").is_file());
    assert!(save.join("z.pdf").is_file());
    assert!(!save.join("net_income.pdf").exists());
}

#[test]
fn test_scan_dir_empty_folder() {
    let dir = tempfile::tempdir().unwrap();
    let predicate = KeywordPredicate::new(["x"], false, false).unwrap();
    let outcome = scan_dir(&Opts::for_folder(dir.path()), predicate, None, read_file()).unwrap();
    assert!(matches!(outcome, RunOutcome::NoDocuments));
}

#[test]
fn test_query_index_with_save() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pdfs");
    write_docs(
        &folder,
        &[
            ("a.pdf", "net income 2023"),
            ("nested/b.pdf", "net income 2022"),
            ("c.pdf", "revenue"),
        ],
    );
    let db = dir.path().join("index.db");
    let opts = opts_for(&folder, &db, 2);
    index_dir(&opts, read_file(), &AssumeYes).unwrap();
    // Second pass so each name is stored twice; it is still copied once.
    index_dir(&opts, read_file(), &AssumeYes).unwrap();

    let save: PathBuf = dir.path().join("saved");
    let predicate = KeywordPredicate::new(["net income"], true, true).unwrap();
    let result = query_index(&opts, &predicate, Some(&save)).unwrap();

    assert_eq!(result.query, "\"net income\"");
    assert_eq!(result.matched.len(), 4);
    assert_eq!(result.copied, 2);
    assert!(result.failures.is_empty());
    assert!(save.join("a.pdf").is_file());
    assert!(save.join("b.pdf").is_file());
    assert!(!save.join("c.pdf").exists());
}

#[test]
fn test_query_index_missing_store_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let opts = opts_for(dir.path(), &dir.path().join("missing.db"), 1);
    let predicate = KeywordPredicate::new(["x"], false, false).unwrap();
    assert!(query_index(&opts, &predicate, None).is_err());
}
