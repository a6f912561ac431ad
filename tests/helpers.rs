//! Shared test utilities for fwcopy tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use fwcopy::config::PipelineConfig;
use fwcopy::error::{Error, Result};
use fwcopy::pipeline::Toolchain;

/// Create a minimal framework bundle on disk: executable plus the usual
/// top-level symlink.
pub fn create_mock_bundle(root: &Path, name: &str) -> PathBuf {
    let bundle = root.join(format!("{name}.framework"));
    fs::create_dir_all(bundle.join("Versions/A")).expect("failed to create bundle dirs");
    fs::write(bundle.join("Versions/A").join(name), b"\xca\xfe\xba\xbe")
        .expect("failed to write mock binary");
    std::os::unix::fs::symlink(format!("Versions/A/{name}"), bundle.join(name))
        .expect("failed to create bundle symlink");
    bundle
}

/// Build a config pointing source/target into a temp directory, bypassing the
/// environment entirely.
pub fn test_config(
    root: &Path,
    name: &str,
    valid: &[&str],
    signing_allowed: bool,
    identity: Option<&str>,
) -> PipelineConfig {
    PipelineConfig {
        framework: format!("{name}.framework"),
        source: root.join(format!("{name}.framework")),
        target: root.join("products").join(format!("{name}.framework")),
        valid_architectures: valid.iter().map(|s| s.to_string()).collect(),
        signing_allowed,
        signing_identity: identity.map(str::to_string),
    }
}

/// Toolchain fake that simulates a slice set in memory and records every
/// strip and sign call.
pub struct FakeToolchain {
    pub slices: RefCell<BTreeSet<String>>,
    pub stripped: RefCell<Vec<String>>,
    pub sign_calls: RefCell<Vec<String>>,
    pub inspect_calls: RefCell<usize>,
    /// Architecture whose strip call should fail, if any.
    pub fail_strip: Option<String>,
}

impl FakeToolchain {
    pub fn with_slices(slices: &[&str]) -> Self {
        Self {
            slices: RefCell::new(slices.iter().map(|s| s.to_string()).collect()),
            stripped: RefCell::new(Vec::new()),
            sign_calls: RefCell::new(Vec::new()),
            inspect_calls: RefCell::new(0),
            fail_strip: None,
        }
    }

    pub fn failing_on(slices: &[&str], arch: &str) -> Self {
        let mut fake = Self::with_slices(slices);
        fake.fail_strip = Some(arch.to_string());
        fake
    }
}

impl Toolchain for FakeToolchain {
    fn architectures(&self, _executable: &Path) -> Result<BTreeSet<String>> {
        *self.inspect_calls.borrow_mut() += 1;
        Ok(self.slices.borrow().clone())
    }

    fn strip(&self, _executable: &Path, architecture: &str) -> Result<()> {
        if self.fail_strip.as_deref() == Some(architecture) {
            return Err(Error::StripFailed {
                architecture: architecture.to_string(),
                reason: "simulated lipo failure".to_string(),
            });
        }
        if !self.slices.borrow_mut().remove(architecture) {
            return Err(Error::StripFailed {
                architecture: architecture.to_string(),
                reason: "architecture not present".to_string(),
            });
        }
        self.stripped.borrow_mut().push(architecture.to_string());
        Ok(())
    }

    fn sign(&self, _bundle: &Path, identity: &str) -> Result<()> {
        self.sign_calls.borrow_mut().push(identity.to_string());
        Ok(())
    }
}
