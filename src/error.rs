use semver::Version;
use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Various error types
#[derive(Debug, Error)]
pub enum ScoutError {
    /// No `.sol` files were discovered under the project root
    #[error("no Solidity project found at \"{0}\"")]
    NoSolidityProject(PathBuf),
    /// A pinned pragma names a version outside the supported set
    #[error("solc {version} is not supported, {}", pragma_hint(*.too_old))]
    UnsupportedVersion {
        version: Version,
        /// Whether the requested version predates the oldest supported one
        too_old: bool,
    },
    /// The solc invocation failed; carries the implicated files
    #[error("solc failed to compile {} file(s): {message}", .files.len())]
    Compilation { message: String, files: Vec<PathBuf> },
    /// The external analyzer exited non-zero
    #[error("analyzer failed: {0}")]
    Analyzer(String),
    /// The external analyzer exceeded its deadline and was killed
    #[error("analyzer timed out after {0:?}")]
    AnalyzerTimeout(Duration),
    #[error(transparent)]
    Install(#[from] svm::SolcVmError),
    #[error(transparent)]
    Semver(#[from] semver::Error),
    /// Deserialization error
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// Filesystem IO error
    #[error(transparent)]
    Io(#[from] ScoutIoError),
    /// General purpose message
    #[error("{0}")]
    Message(String),
}

fn pragma_hint(too_old: bool) -> &'static str {
    if too_old {
        "please upgrade your pragma"
    } else {
        "please downgrade your pragma"
    }
}

impl ScoutError {
    pub(crate) fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        ScoutIoError::new(err, path).into()
    }

    pub(crate) fn solc(msg: impl Into<String>, files: Vec<PathBuf>) -> Self {
        ScoutError::Compilation { message: msg.into(), files }
    }

    pub(crate) fn msg(msg: impl Into<String>) -> Self {
        ScoutError::Message(msg.into())
    }
}

#[derive(Debug, Error)]
#[error("\"{}\": {io}", self.path.display())]
pub struct ScoutIoError {
    io: io::Error,
    path: PathBuf,
}

impl ScoutIoError {
    pub fn new(io: io::Error, path: impl Into<PathBuf>) -> Self {
        Self { io, path: path.into() }
    }
}

impl From<ScoutIoError> for io::Error {
    fn from(err: ScoutIoError) -> Self {
        err.io
    }
}
