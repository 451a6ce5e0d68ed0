//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Config file looked up in the current directory (e.g. `.pdfsift.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Defaults ----

/// Built-in defaults, overridden by the config file and then by CLI flags.
pub struct Defaults;

impl Defaults {
    pub const FOLDER: &'static str = "./pdfs";
    pub const THREADS: usize = 8;
    pub const DB_PATH: &'static str = "index.db";
    pub const EXTENSION: &'static str = "pdf";
    pub const CONVERTER: &'static str = "pdftotext";
    /// Placeholder replaced with the document path in converter args.
    pub const INPUT_PLACEHOLDER: &'static str = "{input}";

    /// `pdftotext <input> -` writes the text to stdout.
    pub fn converter_args() -> Vec<String> {
        vec![Self::INPUT_PLACEHOLDER.to_string(), "-".to_string()]
    }
}

// ---- Progress ----

/// Progress bar descriptions.
pub struct ProgressConsts;

impl ProgressConsts {
    pub const INDEX_DESC: &'static str = "Indexing";
    pub const SCAN_DESC: &'static str = "Scanning";
    pub const UNIT: &'static str = " docs";
}

