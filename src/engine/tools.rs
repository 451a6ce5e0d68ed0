//! Path and filter utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::TraversalError;

/// True if the file name ends with `.{ext}`, ignoring case. `ext` may carry a leading dot.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Check if a file should be excluded based on OS-specific hidden files
pub fn is_os_hidden_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" | "$RECYCLE.BIN" => true,
            // Linux
            ".directory" => true,
            _ => name.starts_with("._") || name.starts_with(".Trash-"),
        }
    } else {
        false
    }
}

/// True if `path` matches any exclude pattern, by file name or by full path.
pub fn is_excluded(path: &Path, exclude_patterns: &[String]) -> bool {
    if exclude_patterns.is_empty() {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let path_str = path.to_str().unwrap_or("");
    exclude_patterns
        .iter()
        .any(|p| glob_match(p, name) || glob_match(p, path_str))
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    // Last '*' position in pattern and the text index it was tried at.
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Canonicalize the root folder, mapping failures to [`TraversalError`].
pub fn check_root_and_canonicalize(root: &Path) -> Result<PathBuf, TraversalError> {
    let meta = std::fs::metadata(root).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => TraversalError::RootNotFound(root.to_path_buf()),
        _ => TraversalError::Unreadable {
            path: root.to_path_buf(),
            source,
        },
    })?;
    if !meta.is_dir() {
        return Err(TraversalError::NotADirectory(root.to_path_buf()));
    }
    // Listing once surfaces permission errors before any worker starts.
    std::fs::read_dir(root).map_err(|source| TraversalError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    root.canonicalize()
        .map_err(|source| TraversalError::Unreadable {
            path: root.to_path_buf(),
            source,
        })
}

/// Create `dir` (and parents) if absent.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create folder {}", dir.display()))
}

/// Copy `src` into `dest_dir` under `name`, overwriting. Returns the destination path.
pub fn copy_into(src: &Path, dest_dir: &Path, name: &str) -> Result<PathBuf> {
    let dest = dest_dir.join(name);
    std::fs::copy(src, &dest)
        .with_context(|| format!("copy {} -> {}", src.display(), dest.display()))?;
    Ok(dest)
}
