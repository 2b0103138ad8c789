//! Solc version resolution from `pragma solidity` declarations

use crate::{
    error::{Result, ScoutError},
    utils,
};
use semver::Version;
use std::{fs, path::Path};

/// The set of solc versions the tool is able to install, together with the
/// version used for floating pragmas.
///
/// Constructed once at startup and passed down explicitly, the supported set
/// is never read from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolcVersions {
    /// All installable versions, sorted ascending
    supported: Vec<Version>,
    /// The version selected for floating (`^`, `>`) or missing pragmas,
    /// the newest supported one
    default: Version,
}

impl SolcVersions {
    /// Creates a new set from the given versions.
    ///
    /// The newest version becomes the default for floating pragmas.
    pub fn new(mut supported: Vec<Version>) -> Result<Self> {
        supported.sort();
        supported.dedup();
        let default = supported
            .last()
            .cloned()
            .ok_or_else(|| ScoutError::msg("supported solc version set must not be empty"))?;
        Ok(Self { supported, default })
    }

    /// All supported versions, oldest first
    pub fn supported(&self) -> &[Version] {
        &self.supported
    }

    /// The version used when a pragma is floating or absent
    pub fn default_version(&self) -> &Version {
        &self.default
    }

    /// Ensures `version` is a member of the supported set
    pub fn ensure_supported(&self, version: &Version) -> Result<()> {
        if self.supported.binary_search(version).is_ok() {
            Ok(())
        } else {
            Err(ScoutError::UnsupportedVersion {
                version: version.clone(),
                too_old: version < &self.supported[0],
            })
        }
    }
}

impl Default for SolcVersions {
    fn default() -> Self {
        let mut supported: Vec<_> = (11..=25).map(|patch| Version::new(0, 4, patch)).collect();
        supported.extend((0..=7).map(|patch| Version::new(0, 5, patch)));
        let default = supported.last().cloned().expect("set is non-empty");
        Self { supported, default }
    }
}

/// Resolves the solc version declared by the file at `path`, see
/// [`resolve_source`]
pub fn resolve_file(path: impl AsRef<Path>, versions: &SolcVersions) -> Result<Version> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| ScoutError::io(err, path))?;
    resolve_source(&content, versions)
}

/// Resolves the solc version declared by a solidity source.
///
/// The first line containing the `pragma` keyword, skipping `experimental`
/// pragmas, is taken as the version declaration. A caret or `>` anywhere in
/// that line marks the constraint as floating and the default version is
/// used. Otherwise the first `major.minor.patch` token is the pinned version,
/// which must be a member of the supported set. Sources without any pragma
/// line resolve to the default version.
pub fn resolve_source(content: &str, versions: &SolcVersions) -> Result<Version> {
    for line in content.lines() {
        if !line.contains("pragma") || line.contains("experimental") {
            continue
        }
        if line.contains('^') || line.contains('>') {
            return Ok(versions.default_version().clone())
        }
        return match utils::RE_SOL_VERSION.find(line) {
            Some(m) => {
                let version = Version::parse(m.as_str())?;
                versions.ensure_supported(&version)?;
                Ok(version)
            }
            // a pragma line without an extractable version token, treat it
            // like a missing pragma
            None => Ok(versions.default_version().clone()),
        }
    }
    Ok(versions.default_version().clone())
}

/// Resolves the single solc version used to compile the whole project: the
/// minimum of the per-file versions by (major, minor, patch) ordering.
///
/// The minimum maximizes the chance that every file, including older pinned
/// dependencies, compiles under one invocation.
pub fn resolve_project<I, P>(files: I, versions: &SolcVersions) -> Result<Version>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut min = None;
    for file in files {
        let version = resolve_file(file, versions)?;
        match min {
            Some(ref m) if *m <= version => {}
            _ => min = Some(version),
        }
    }
    min.ok_or_else(|| ScoutError::msg("cannot resolve a solc version without source files"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{fs::File, io::Write};
    use tempfile::tempdir;

    fn source(pragma: &str) -> String {
        format!("pragma solidity {};\ncontract A {{}}\n", pragma)
    }

    fn versions() -> SolcVersions {
        SolcVersions::default()
    }

    #[test]
    fn pinned_pragma_resolves_exactly() {
        for pinned in ["0.4.11", "0.4.18", "0.4.24", "0.5.0"] {
            let version = resolve_source(&source(pinned), &versions()).unwrap();
            assert_eq!(version, Version::parse(pinned).unwrap());
        }
    }

    #[test]
    fn floating_pragma_resolves_to_default() {
        let versions = versions();
        for floating in ["^0.4.11", ">=0.4.21 <0.6.0", ">0.4.18", "^0.5.0"] {
            let version = resolve_source(&source(floating), &versions).unwrap();
            assert_eq!(&version, versions.default_version());
        }
    }

    #[test]
    fn missing_pragma_resolves_to_default() {
        let versions = versions();
        let version = resolve_source("contract A {}\n", &versions).unwrap();
        assert_eq!(&version, versions.default_version());
    }

    #[test]
    fn pragma_without_version_token_resolves_to_default() {
        let versions = versions();
        for content in ["pragma solidity;\n", "pragma solidity tokenless;\ncontract A {}\n"] {
            let version = resolve_source(content, &versions).unwrap();
            assert_eq!(&version, versions.default_version());
        }
    }

    #[test]
    fn experimental_pragma_is_skipped() {
        let content = "pragma experimental ABIEncoderV2;\npragma solidity 0.4.24;\n";
        let version = resolve_source(content, &versions()).unwrap();
        assert_eq!(version, Version::new(0, 4, 24));
    }

    #[test]
    fn rejects_versions_below_supported_range() {
        let err = resolve_source(&source("0.3.0"), &versions()).unwrap_err();
        match err {
            ScoutError::UnsupportedVersion { version, too_old } => {
                assert_eq!(version, Version::new(0, 3, 0));
                assert!(too_old);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_versions_above_supported_range() {
        let err = resolve_source(&source("0.8.17"), &versions()).unwrap_err();
        match err {
            ScoutError::UnsupportedVersion { version, too_old } => {
                assert_eq!(version, Version::new(0, 8, 17));
                assert!(!too_old);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn project_version_is_the_minimum() {
        let tmp = tempdir().unwrap();
        let versions = versions();
        let mut files = Vec::new();
        for (name, pragma) in [("a.sol", "0.4.24"), ("b.sol", "0.4.18"), ("c.sol", "0.5.0")] {
            let path = tmp.path().join(name);
            let mut file = File::create(&path).unwrap();
            writeln!(file, "pragma solidity {pragma};").unwrap();
            files.push(path);
        }
        let version = resolve_project(&files, &versions).unwrap();
        assert_eq!(version, Version::new(0, 4, 18));

        // selection is independent of enumeration order
        files.reverse();
        let version = resolve_project(&files, &versions).unwrap();
        assert_eq!(version, Version::new(0, 4, 18));
    }

    #[test]
    fn custom_version_set() {
        let versions = SolcVersions::new(vec![
            Version::new(0, 4, 24),
            Version::new(0, 4, 18),
            Version::new(0, 4, 24),
        ])
        .unwrap();
        assert_eq!(versions.supported().len(), 2);
        assert_eq!(versions.default_version(), &Version::new(0, 4, 24));
        assert!(versions.ensure_supported(&Version::new(0, 4, 18)).is_ok());
        assert!(versions.ensure_supported(&Version::new(0, 4, 19)).is_err());
    }
}
