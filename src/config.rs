use std::path::{Path, PathBuf};

/// Conventional project root when none is given on the command line
pub const DEFAULT_PROJECT_ROOT: &str = "/project";

/// Well known path the merged compilation artifact is written to
pub const COMPILATION_OUTPUT: &str = "/comp.json";

/// Well known path the analyzer writes its findings to
pub const ANALYZER_OUTPUT: &str = "/securify_res.json";

/// How sources are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectLayout {
    /// A plain directory of `.sol` files, walked from the project root
    #[default]
    Plain,
    /// A truffle managed project, sources live under `<root>/contracts`
    Truffle,
}

/// Where to find all files and where to write them
#[derive(Debug, Clone)]
pub struct ProjectPathsConfig {
    /// Project root
    pub root: PathBuf,
    /// Where to find sources, dependent on the layout
    pub sources: PathBuf,
    /// Where the merged compilation artifact is written
    pub artifact: PathBuf,
    /// Where the analyzer report is written
    pub report: PathBuf,
    /// The layout the sources follow
    pub layout: ProjectLayout,
}

impl ProjectPathsConfig {
    /// Creates the config for a plain directory of sources
    pub fn plain(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, ProjectLayout::Plain)
    }

    /// Creates the config for a truffle managed project
    pub fn truffle(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, ProjectLayout::Truffle)
    }

    pub fn with_layout(root: impl Into<PathBuf>, layout: ProjectLayout) -> Self {
        let root = crate::utils::canonicalize(root.into());
        let sources = match layout {
            ProjectLayout::Plain => root.clone(),
            ProjectLayout::Truffle => root.join("contracts"),
        };
        Self {
            sources,
            artifact: PathBuf::from(COMPILATION_OUTPUT),
            report: PathBuf::from(ANALYZER_OUTPUT),
            layout,
            root,
        }
    }

    /// The directory solc is allowed to read files from
    pub fn allowed_paths(&self) -> &Path {
        &self.root
    }
}
