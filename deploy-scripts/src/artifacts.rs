//! Lookup of compiled contract artifacts and constructor calldata encoding

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::JsonAbi,
    primitives::Bytes,
};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    constants::{ARTIFACT_EXTENSION, BUILD_INFO_DIR},
    context::NetworkContext,
    errors::DeployError,
    factory::ContractFactory,
};

/// The on-disk layout of a Hardhat contract artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    bytecode: String,
    #[serde(default)]
    link_references: Map<String, Value>,
}

/// A compiled contract: its ABI and creation bytecode
#[derive(Clone, Debug)]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The source file the contract is defined in
    pub source_name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode
    pub bytecode: Bytes,
    /// Libraries the bytecode must be linked against before deployment
    pub unlinked_libraries: Vec<String>,
}

impl Artifact {
    /// Parse an artifact from the JSON contents of an artifact file
    pub fn from_json(contents: &str) -> Result<Self, DeployError> {
        let raw: HardhatArtifact =
            serde_json::from_str(contents).map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;

        // Placeholder bytecode of unlinked artifacts is not valid hex
        let unlinked_libraries = raw.link_references.keys().cloned().collect_vec();
        let bytecode = if unlinked_libraries.is_empty() {
            Bytes::from_str(&raw.bytecode).map_err(|e| {
                DeployError::ArtifactParsing(format!("{}: {e}", raw.contract_name))
            })?
        } else {
            Bytes::new()
        };

        Ok(Self {
            contract_name: raw.contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode,
            unlinked_libraries,
        })
    }

    /// The `<source>:<contract>` name identifying this artifact
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Check that the artifact holds deployable bytecode
    pub fn ensure_deployable(&self) -> Result<(), DeployError> {
        if !self.unlinked_libraries.is_empty() {
            return Err(DeployError::ArtifactParsing(format!(
                "{} must be linked against {} before deployment",
                self.fully_qualified_name(),
                self.unlinked_libraries.join(", ")
            )));
        }

        if self.bytecode.is_empty() {
            return Err(DeployError::ArtifactParsing(format!(
                "{} has no bytecode, it is abstract or an interface",
                self.fully_qualified_name()
            )));
        }

        Ok(())
    }

    /// Build the creation code for the contract: the bytecode followed by the
    /// ABI-encoded constructor arguments
    pub fn deploy_code(&self, args: &[String]) -> Result<Bytes, DeployError> {
        let encoded_args = match self.abi.constructor() {
            Some(constructor) => {
                if constructor.inputs.len() != args.len() {
                    return Err(DeployError::calldata(
                        &self.contract_name,
                        format!(
                            "expected {} constructor arguments, got {}",
                            constructor.inputs.len(),
                            args.len()
                        ),
                    ));
                }

                let values: Vec<DynSolValue> = constructor
                    .inputs
                    .iter()
                    .zip(args)
                    .map(|(param, arg)| {
                        let ty: DynSolType = param
                            .resolve()
                            .map_err(|e| DeployError::calldata(&self.contract_name, e))?;
                        ty.coerce_str(arg).map_err(|e| {
                            DeployError::calldata(
                                &self.contract_name,
                                format!("invalid value {arg:?} for `{}`: {e}", param.name),
                            )
                        })
                    })
                    .collect::<Result<_, _>>()?;

                constructor
                    .abi_encode_input(&values)
                    .map_err(|e| DeployError::calldata(&self.contract_name, e))?
            }
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(DeployError::calldata(
                    &self.contract_name,
                    format!("contract has no constructor but {} arguments were given", args.len()),
                ))
            }
        };

        Ok([&self.bytecode[..], encoded_args.as_slice()].concat().into())
    }
}

/// Finds compiled artifacts in a Hardhat artifacts directory
#[derive(Clone, Debug)]
pub struct ArtifactResolver {
    /// The root of the artifacts directory
    artifacts_dir: PathBuf,
}

impl ArtifactResolver {
    /// Create a resolver over the given artifacts directory
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
        }
    }

    /// Look up the artifact for a contract.
    ///
    /// The name is either bare (`Demo`) or fully qualified
    /// (`contracts/Demo.sol:Demo`). A bare name defined in more than one
    /// source file is ambiguous.
    pub fn load(&self, name: &str) -> Result<Artifact, DeployError> {
        let (source_name, contract_name) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        if !self.artifacts_dir.is_dir() {
            warn!(
                "artifacts directory {} does not exist, have the contracts been compiled?",
                self.artifacts_dir.display()
            );
            return Err(DeployError::ArtifactNotFound(name.to_string()));
        }

        let file_name = format!("{contract_name}.{ARTIFACT_EXTENSION}");
        let mut paths = Vec::new();
        find_files_named(&self.artifacts_dir, &file_name, &mut paths)?;

        let mut matches: Vec<Artifact> = paths
            .iter()
            .map(|path| read_artifact(path))
            .filter_ok(|artifact| {
                artifact.contract_name == contract_name
                    && source_name.map_or(true, |source| artifact.source_name == source)
            })
            .collect::<Result<_, _>>()?;

        match matches.len() {
            0 => Err(DeployError::ArtifactNotFound(name.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(DeployError::ArtifactParsing(format!(
                "{name} is ambiguous, use one of: {}",
                matches.iter().map(Artifact::fully_qualified_name).join(", ")
            ))),
        }
    }

    /// Look up a contract's artifact and bind it to the context's signer
    pub fn resolve<'a>(
        &self,
        name: &str,
        context: &'a NetworkContext,
    ) -> Result<ContractFactory<'a>, DeployError> {
        let artifact = self.load(name)?;
        artifact.ensure_deployable()?;
        Ok(ContractFactory::new(artifact, context))
    }
}

/// Read and parse a single artifact file
fn read_artifact(path: &Path) -> Result<Artifact, DeployError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DeployError::ArtifactParsing(format!("{}: {e}", path.display())))?;
    Artifact::from_json(&contents)
}

/// Recursively collect the files under `dir` with the given file name
fn find_files_named(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), DeployError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| DeployError::ArtifactParsing(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| DeployError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            // Build info files hold compiler input/output, not artifacts
            if path.file_name().is_some_and(|name| name == BUILD_INFO_DIR) {
                continue;
            }
            find_files_named(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            found.push(path);
        }
    }

    Ok(())
}
