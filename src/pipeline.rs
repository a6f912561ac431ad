//! The copy/inspect/strip/sign pipeline.
//!
//! One linear, short-circuiting pass per invocation. The copy must finish
//! before inspection because stripping and signing operate on the target copy,
//! never on the source. Nothing is retried and completed stages are not rolled
//! back; the invoking build system sees the first failure verbatim.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;

use crate::config::PipelineConfig;
use crate::copy;
use crate::error::{Error, Result};
use crate::lipo;
use crate::sign;

/// External binary tools the pipeline drives.
///
/// The orchestrator's own logic (set difference, the last-slice guard, the
/// signing decision) is independent of the actual toolchain; tests substitute
/// a fake that simulates slice sets and failures.
pub trait Toolchain {
    fn architectures(&self, executable: &Path) -> Result<BTreeSet<String>>;
    fn strip(&self, executable: &Path, architecture: &str) -> Result<()>;
    fn sign(&self, bundle: &Path, identity: &str) -> Result<()>;
}

/// Real toolchain: `lipo` for slices, `codesign` for signatures.
pub struct XcodeTools;

impl XcodeTools {
    /// Verify the required tools are on PATH before touching the filesystem.
    pub fn preflight() -> anyhow::Result<()> {
        for tool in ["lipo", "codesign"] {
            which::which(tool).with_context(|| format!("'{tool}' not found in PATH"))?;
        }
        Ok(())
    }
}

impl Toolchain for XcodeTools {
    fn architectures(&self, executable: &Path) -> Result<BTreeSet<String>> {
        lipo::architectures(executable)
    }

    fn strip(&self, executable: &Path, architecture: &str) -> Result<()> {
        lipo::strip(executable, architecture)
    }

    fn sign(&self, bundle: &Path, identity: &str) -> Result<()> {
        sign::sign(bundle, identity)
    }
}

/// What one successful run did, for the build log and for tests.
#[derive(Debug)]
pub struct PipelineReport {
    /// Slices found in the target after copy.
    pub present: BTreeSet<String>,
    /// Slices removed, in the order they were stripped.
    pub stripped: Vec<String>,
    pub signed: bool,
}

/// Run the full pipeline for one framework.
pub fn run(config: &PipelineConfig, tools: &impl Toolchain) -> Result<PipelineReport> {
    println!(
        "Copying {} -> {}",
        config.source.display(),
        config.target.display()
    );
    copy::copy_bundle(&config.source, &config.target)?;

    let executable = lipo::executable_path(&config.target)?;
    let present = tools.architectures(&executable)?;

    let excess: BTreeSet<String> = present
        .difference(&config.valid_architectures)
        .cloned()
        .collect();

    // Stripping every slice would leave an empty binary; a VALID_ARCHS that
    // excludes the whole set is a configuration inconsistency, not a thinning
    // request.
    if !excess.is_empty() && excess.len() == present.len() {
        let architecture = excess
            .iter()
            .next()
            .cloned()
            .unwrap_or_default();
        return Err(Error::StripFailed {
            architecture,
            reason: format!(
                "VALID_ARCHS excludes every architecture in the binary ({})",
                join(&present)
            ),
        });
    }

    let mut stripped = Vec::new();
    for architecture in &excess {
        println!("Stripping {architecture} from {}", config.framework);
        tools.strip(&executable, architecture)?;
        stripped.push(architecture.clone());
    }

    let signed = match (config.signing_allowed, config.signing_identity.as_deref()) {
        (true, Some(identity)) => {
            println!("Signing {} with '{identity}'", config.framework);
            tools.sign(&config.target, identity)?;
            true
        }
        _ => {
            println!("Code signing skipped for {}", config.framework);
            false
        }
    };

    Ok(PipelineReport {
        present,
        stripped,
        signed,
    })
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(" ")
}
