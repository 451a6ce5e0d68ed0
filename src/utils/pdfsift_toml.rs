//! Load `.pdfsift.toml` from the working directory (CLI only). Library callers build [`Opts`] directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PdfsiftToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    folder: Option<String>,
    threads: Option<usize>,
    db_path: Option<String>,
    extension: Option<String>,
    converter: Option<String>,
    converter_args: Option<Vec<String>>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    strict: Option<bool>,
    verbose: Option<bool>,
    quiet: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if missing, unreadable, or invalid (logged).
pub(crate) fn load_pdfsift_toml(dir: &Path) -> Option<PdfsiftToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_pdfsift_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_pdfsift_toml(s: &str) -> Result<PdfsiftToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident) => {
        if let Some(ref v) = $section.$field {
            $opts.$field = v.clone();
        }
    };
}

/// Apply file settings on top of defaults. Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &PdfsiftToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.folder {
        opts.folder = PathBuf::from(p);
    }
    if let Some(ref p) = s.db_path {
        opts.db_path = PathBuf::from(p);
    }
    apply_file_opt!(s, opts, threads);
    apply_file_opt!(s, opts, extension);
    apply_file_opt!(s, opts, converter);
    apply_file_opt!(s, opts, converter_args);
    apply_file_opt!(s, opts, follow_links);
    apply_file_opt!(s, opts, exclude);
    apply_file_opt!(s, opts, strict);
    apply_file_opt!(s, opts, verbose);
    if let Some(quiet) = s.quiet {
        opts.progress = !quiet;
    }
}
