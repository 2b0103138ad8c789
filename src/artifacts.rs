//! Output types of solc's combined-json mode

use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, fs, path::Path};

/// An output field that can be requested from solc's combined-json mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputValue {
    Abi,
    Ast,
    BinRuntime,
    SrcmapRuntime,
}

impl OutputValue {
    /// All values the analyzer needs
    pub fn all() -> Vec<OutputValue> {
        vec![
            OutputValue::Abi,
            OutputValue::Ast,
            OutputValue::BinRuntime,
            OutputValue::SrcmapRuntime,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputValue::Abi => "abi",
            OutputValue::Ast => "ast",
            OutputValue::BinRuntime => "bin-runtime",
            OutputValue::SrcmapRuntime => "srcmap-runtime",
        }
    }

    /// Renders the comma separated list passed to `--combined-json`
    pub fn combined_json_arg(values: &[OutputValue]) -> String {
        values.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The merged output of one combined-json solc run over all project files,
/// keyed by `<path>:<ContractName>`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedOutput {
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractArtifact>,
    /// Per source file data, keyed by path; only present when the ast was
    /// requested
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, SourceArtifact>,
    /// The long version string of the compiler that produced the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<serde_json::Value>,
    #[serde(rename = "bin-runtime", default, skip_serializing_if = "Option::is_none")]
    pub bin_runtime: Option<String>,
    #[serde(rename = "srcmap-runtime", default, skip_serializing_if = "Option::is_none")]
    pub srcmap_runtime: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceArtifact {
    #[serde(rename = "AST", default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<serde_json::Value>,
}

impl CombinedOutput {
    /// Parses solc's combined-json stdout.
    ///
    /// Older compilers emit the `abi` field as a json encoded string rather
    /// than an array, those are decoded before the typed deserialization.
    pub fn from_solc_stdout(stdout: &[u8]) -> Result<Self> {
        let mut raw: serde_json::Value = serde_json::from_slice(stdout)?;
        if let Some(contracts) = raw.get_mut("contracts").and_then(|c| c.as_object_mut()) {
            for contract in contracts.values_mut() {
                let Some(abi) = contract.get_mut("abi") else { continue };
                if let Some(encoded) = abi.as_str() {
                    *abi = serde_json::from_str(encoded)?;
                }
            }
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Serializes the artifact to the well known path the analyzer reads.
    ///
    /// The analyzer expects the document root to be the contracts map itself,
    /// keyed by `<path>:<ContractName>`, not the full compiler output.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path).map_err(|err| ScoutError::io(err, path))?;
        Ok(serde_json::to_writer(file, &self.contracts)?)
    }
}
