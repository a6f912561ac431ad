//! Configuration resolution for the copy-frameworks pipeline.
//!
//! All pipeline inputs come from the build system's environment. The
//! environment is snapshotted into a map once, and `resolve` is a pure
//! function over that map, so tests inject configuration directly instead of
//! mutating process globals.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Base directory of build products.
pub const CONFIGURATION_BUILD_DIR: &str = "CONFIGURATION_BUILD_DIR";
/// Subpath under the build products directory where frameworks land.
pub const FRAMEWORKS_FOLDER_PATH: &str = "FRAMEWORKS_FOLDER_PATH";
/// Project root; compiled frameworks are found under it before copy.
pub const SRCROOT: &str = "SRCROOT";
/// Space-separated architectures the final product must retain.
pub const VALID_ARCHS: &str = "VALID_ARCHS";
/// Signing is considered only when this equals "YES".
pub const CODE_SIGNING_ALLOWED: &str = "CODE_SIGNING_ALLOWED";
/// Identity to sign with; absent means run unsigned.
pub const EXPANDED_CODE_SIGN_IDENTITY: &str = "EXPANDED_CODE_SIGN_IDENTITY";

/// Where built framework bundles live under SRCROOT.
pub const BUILT_FRAMEWORKS_SUBDIR: &str = "Frameworks/Build/iOS";

/// Immutable inputs for one pipeline run. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bundle directory name, e.g. "Alamofire.framework".
    pub framework: String,
    /// Compiled bundle, before copy.
    pub source: PathBuf,
    /// Destination inside the build products directory.
    pub target: PathBuf,
    /// Architectures the final product keeps.
    pub valid_architectures: BTreeSet<String>,
    pub signing_allowed: bool,
    pub signing_identity: Option<String>,
}

impl PipelineConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env(framework: &str) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(framework, &env)
    }

    /// Resolve configuration from an explicit variable map.
    ///
    /// Fails on the first missing required variable, before any filesystem
    /// access happens anywhere in the pipeline.
    pub fn resolve(framework: &str, env: &HashMap<String, String>) -> Result<Self> {
        let build_dir = required(env, CONFIGURATION_BUILD_DIR)?;
        let frameworks_folder = required(env, FRAMEWORKS_FOLDER_PATH)?;
        let srcroot = required(env, SRCROOT)?;
        let valid_archs = required(env, VALID_ARCHS)?;

        let valid_architectures: BTreeSet<String> = valid_archs
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let signing_allowed = env
            .get(CODE_SIGNING_ALLOWED)
            .is_some_and(|v| v == "YES");

        // An empty identity means the same thing as an unset one: run unsigned.
        let signing_identity = env
            .get(EXPANDED_CODE_SIGN_IDENTITY)
            .filter(|v| !v.is_empty())
            .cloned();

        let source = PathBuf::from(srcroot)
            .join(BUILT_FRAMEWORKS_SUBDIR)
            .join(framework);
        let target = PathBuf::from(build_dir)
            .join(frameworks_folder)
            .join(framework);

        Ok(Self {
            framework: framework.to_string(),
            source,
            target,
            valid_architectures,
            signing_allowed,
            signing_identity,
        })
    }

    /// Signing runs only when the build allows it and an identity exists.
    pub fn should_sign(&self) -> bool {
        self.signing_allowed && self.signing_identity.is_some()
    }
}

fn required(env: &HashMap<String, String>, name: &str) -> Result<String> {
    env.get(name)
        .cloned()
        .ok_or_else(|| Error::MissingConfiguration(name.to_string()))
}
