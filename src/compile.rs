use crate::{
    artifacts::{CombinedOutput, OutputValue},
    error::{Result, ScoutError},
    remappings::Remapping,
};
use semver::Version;
use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Abstraction over the `solc` command line utility
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub struct Solc(pub PathBuf);

impl Solc {
    /// A new instance which points to the given `solc` binary
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Solc(path.into())
    }

    /// Returns the directory in which [svm](https://github.com/alloy-rs/svm-rs)
    /// stores all versions
    ///
    /// This will be `~/.svm` on unix
    pub fn svm_home() -> Option<PathBuf> {
        home::home_dir().map(|dir| dir.join(".svm"))
    }

    /// Returns the path for an svm installed version, if the binary is cached
    pub fn find_installed_version(version: &Version) -> Result<Option<Self>> {
        let version = version.to_string();
        let solc = walkdir::WalkDir::new(
            Self::svm_home().ok_or_else(|| ScoutError::msg("svm home dir not found"))?,
        )
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .find(|e| e.path().ends_with(&version))
        .map(|e| e.path().join(format!("solc-{version}")))
        .filter(|path| path.is_file())
        .map(Solc::new);
        Ok(solc)
    }

    /// Returns the binary for the given version, installing it into the
    /// per-user cache on first use.
    ///
    /// Installation is idempotent, repeated builds at the same version never
    /// fetch again.
    pub fn find_or_install(version: &Version) -> Result<Self> {
        if let Some(solc) = Self::find_installed_version(version)? {
            return Ok(solc)
        }
        tracing::debug!("installing solc {version}");
        let solc = svm::blocking_install(version)?;
        tracing::debug!("installed solc {version}");
        Ok(Solc::new(solc))
    }

    /// Compiles all `files` in one combined-json invocation and parses the
    /// result.
    ///
    /// `allow_paths` confines the compiler to the project root so it cannot
    /// read files outside of it.
    pub fn compile_combined(
        &self,
        files: &[PathBuf],
        remappings: &[Remapping],
        allow_paths: &Path,
        output_values: &[OutputValue],
    ) -> Result<CombinedOutput> {
        let mut cmd = self.combined_json_command(files, remappings, allow_paths, output_values);
        let output = cmd.output().map_err(|err| ScoutError::io(err, &self.0))?;
        if !output.status.success() {
            return Err(ScoutError::solc(
                String::from_utf8_lossy(&output.stderr).to_string(),
                files.to_vec(),
            ))
        }
        CombinedOutput::from_solc_stdout(&output.stdout).map_err(|err| {
            ScoutError::solc(format!("unparsable compiler output: {err}"), files.to_vec())
        })
    }

    fn combined_json_command(
        &self,
        files: &[PathBuf],
        remappings: &[Remapping],
        allow_paths: &Path,
        output_values: &[OutputValue],
    ) -> Command {
        let mut cmd = Command::new(&self.0);
        cmd.stdin(Stdio::null())
            .stderr(Stdio::piped())
            .stdout(Stdio::piped())
            .arg("--combined-json")
            .arg(OutputValue::combined_json_arg(output_values))
            .arg("--allow-paths")
            .arg(allow_paths);
        for remapping in remappings {
            cmd.arg(remapping.to_string());
        }
        cmd.args(files);
        cmd
    }
}

impl AsRef<Path> for Solc {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl<T: Into<PathBuf>> From<T> for Solc {
    fn from(solc: T) -> Self {
        Solc(solc.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_combined_json_invocation() {
        let solc = Solc::new("/cache/0.4.24/solc-0.4.24");
        let files = vec![PathBuf::from("/project/A.sol"), PathBuf::from("/project/B.sol")];
        let remappings =
            vec![Remapping::new("openzeppelin-solidity", "/project/node_modules/openzeppelin-solidity")];

        let cmd = solc.combined_json_command(
            &files,
            &remappings,
            Path::new("/project"),
            &OutputValue::all(),
        );

        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "--combined-json",
                "abi,ast,bin-runtime,srcmap-runtime",
                "--allow-paths",
                "/project",
                "openzeppelin-solidity=/project/node_modules/openzeppelin-solidity",
                "/project/A.sol",
                "/project/B.sol",
            ]
        );
        assert_eq!(cmd.get_program(), "/cache/0.4.24/solc-0.4.24");
    }

    #[test]
    fn does_not_find_not_installed_version() {
        let version = Version::new(1, 1, 1);
        let res = Solc::find_installed_version(&version).unwrap();
        assert!(res.is_none());
    }
}
