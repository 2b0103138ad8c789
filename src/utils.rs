//! Utility functions

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

/// A regex that matches a pinned solidity version token: `0.4.24` in
/// `pragma solidity 0.4.24;`
pub static RE_SOL_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"0\.\d+\.\d+").unwrap());

/// Returns a list of absolute paths to all the solidity files under the root,
/// sorted by path so the result is independent of directory enumeration order.
///
/// NOTE: this does not apply any project specific exclusion rules, see
/// [`crate::resolver`] for those.
pub fn source_files(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|ext| ext == "sol").unwrap_or_default())
        .map(|e| e.path().into())
        .collect();
    files.sort();
    files
}

/// Whether any normal component of `path` is exactly `segment`.
///
/// Matching whole components avoids false positives on names that merely
/// contain the segment, like `contest/` vs `test/`.
pub fn has_path_segment(path: impl AsRef<Path>, segment: &str) -> bool {
    path.as_ref()
        .components()
        .any(|c| matches!(c, Component::Normal(s) if s == segment))
}

/// Returns the path's canonical, absolute form, falling back to the input if
/// canonicalization fails
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
