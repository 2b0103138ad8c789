//! Project resolution: source discovery and library remappings

use crate::{config::ProjectPathsConfig, remappings::Remapping, utils};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory name node based package managers vendor dependencies into
pub const NODE_MODULES_DIR: &str = "node_modules";

/// Directory name conventionally holding test contracts
pub const TESTS_DIR: &str = "test";

/// Vendored packages that are remapped to their symbolic import name when
/// present under `node_modules`
pub const KNOWN_LIBRARIES: &[&str] = &["zeppelin-solidity", "openzeppelin-solidity"];

/// Returns all compilable `.sol` files under the project's source root.
///
/// Files below a `node_modules` or `test` directory are excluded, matched by
/// whole path segment relative to the project root so that directories like
/// `contest/` are kept. The result is sorted by path and therefore
/// independent of directory enumeration order.
pub fn discover_sources(paths: &ProjectPathsConfig) -> Vec<PathBuf> {
    utils::source_files(&paths.sources)
        .into_iter()
        .filter(|file| {
            let relative = file.strip_prefix(&paths.root).unwrap_or(file);
            !utils::has_path_segment(relative, NODE_MODULES_DIR) &&
                !utils::has_path_segment(relative, TESTS_DIR)
        })
        .collect()
}

/// Returns the `node_modules` directory of the project, if any.
///
/// The shallowest match wins, deeper shadowed copies inside other packages
/// are ignored.
pub fn find_node_modules(root: impl AsRef<Path>) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir() && e.file_name() == NODE_MODULES_DIR)
        .min_by_key(|e| e.depth())
        .map(|e| e.path().to_path_buf())
}

/// Detects known vendored libraries and emits one remapping per package that
/// is present, mapping its symbolic import name to the absolute path of the
/// vendored copy.
pub fn library_remappings(root: impl AsRef<Path>) -> Vec<Remapping> {
    let mut remappings = Vec::new();
    let node_modules = match find_node_modules(root) {
        Some(dir) => dir,
        None => return remappings,
    };
    for library in KNOWN_LIBRARIES {
        let path = node_modules.join(library);
        if path.is_dir() {
            remappings.push(Remapping::new(*library, utils::canonicalize(path)));
        }
    }
    remappings
}
