#![doc = include_str!("../README.md")]

pub mod analyzer;
pub mod artifacts;
mod compile;
pub mod config;
pub mod error;
pub mod remappings;
pub mod resolver;
pub mod utils;
pub mod version;

pub use analyzer::Analyzer;
pub use artifacts::{CombinedOutput, OutputValue};
pub use compile::Solc;
pub use config::{ProjectLayout, ProjectPathsConfig};
pub use remappings::Remapping;
pub use version::SolcVersions;

use error::{Result, ScoutError};
use std::{io::Write, path::PathBuf};

/// Handles compiling a project and analyzing the result.
///
/// One invocation runs the strictly sequential pipeline
/// discover, resolve version, ensure binary, compile, write artifact,
/// analyze, report. Any failure aborts the remaining stages.
#[derive(Debug)]
pub struct Project {
    /// The layout of the project
    pub paths: ProjectPathsConfig,
    /// The solc versions that can be installed
    pub versions: SolcVersions,
    /// Which fields to request from the compiler
    pub output_values: Vec<OutputValue>,
    /// How to run the external analyzer
    pub analyzer: Analyzer,
}

impl Project {
    /// Configure the current project
    ///
    /// # Example
    ///
    /// ```rust
    /// use solscout::Project;
    /// let project = Project::builder().build();
    /// ```
    pub fn builder() -> ProjectBuilder {
        ProjectBuilder::default()
    }

    /// Returns all compilable sources of the project, see
    /// [`resolver::discover_sources`]
    pub fn sources(&self) -> Vec<PathBuf> {
        resolver::discover_sources(&self.paths)
    }

    /// Returns the remappings for vendored libraries detected under the
    /// project root
    pub fn remappings(&self) -> Vec<Remapping> {
        resolver::library_remappings(&self.paths.root)
    }

    /// Compiles the project into the merged artifact and persists it at the
    /// configured artifact path.
    ///
    /// Fails before any compiler work if no sources are discovered or if a
    /// pinned pragma names an unsupported version.
    pub fn compile(&self) -> Result<CombinedOutput> {
        let sources = self.sources();
        if sources.is_empty() {
            return Err(ScoutError::NoSolidityProject(self.paths.root.clone()))
        }
        let version = version::resolve_project(&sources, &self.versions)?;
        let remappings = self.remappings();
        tracing::info!(
            "compiling {} file(s) with solc {version}, {} remapping(s)",
            sources.len(),
            remappings.len()
        );

        let solc = Solc::find_or_install(&version)?;
        let output = solc.compile_combined(
            &sources,
            &remappings,
            self.paths.allowed_paths(),
            &self.output_values,
        )?;
        output.write(&self.paths.artifact)?;
        Ok(output)
    }

    /// Runs the whole pipeline, streaming the analyzer's findings to
    /// `writer` on success
    pub fn run(&self, writer: &mut impl Write) -> Result<()> {
        self.compile()?;
        self.analyzer.run(&self.paths.artifact, &self.paths.report)?;
        analyzer::stream_report(&self.paths.report, writer)
    }
}

pub struct ProjectBuilder {
    paths: Option<ProjectPathsConfig>,
    versions: Option<SolcVersions>,
    output_values: Option<Vec<OutputValue>>,
    analyzer: Option<Analyzer>,
}

impl ProjectBuilder {
    pub fn paths(mut self, paths: ProjectPathsConfig) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn versions(mut self, versions: SolcVersions) -> Self {
        self.versions = Some(versions);
        self
    }

    pub fn output_values(mut self, output_values: Vec<OutputValue>) -> Self {
        self.output_values = Some(output_values);
        self
    }

    pub fn analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn build(self) -> Project {
        let Self { paths, versions, output_values, analyzer } = self;
        Project {
            paths: paths
                .unwrap_or_else(|| ProjectPathsConfig::plain(config::DEFAULT_PROJECT_ROOT)),
            versions: versions.unwrap_or_default(),
            output_values: output_values.unwrap_or_else(OutputValue::all),
            analyzer: analyzer.unwrap_or_default(),
        }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self { paths: None, versions: None, output_values: None, analyzer: None }
    }
}
