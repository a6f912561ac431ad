//! Architecture inspection and slice removal via `lipo`.
//!
//! `lipo -info` reads the Mach-O header directly, so inspecting the same
//! bundle bytes always reports the same slice set. Two output shapes exist:
//!
//! ```text
//! Architectures in the fat file: /path/Demo are: armv7 arm64
//! Non-fat file: /path/Demo is architecture: arm64
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::process::Cmd;

/// The executable inside a framework bundle is named after the bundle,
/// minus its extension: `Demo.framework/Demo`.
pub fn executable_path(bundle: &Path) -> Result<PathBuf> {
    let stem = bundle
        .file_stem()
        .ok_or_else(|| {
            Error::InspectionFailed(format!("no bundle name in path: {}", bundle.display()))
        })?;
    Ok(bundle.join(stem))
}

/// Enumerate the architecture slices embedded in a binary.
pub fn architectures(executable: &Path) -> Result<BTreeSet<String>> {
    let result = Cmd::new("lipo")
        .arg("-info")
        .arg_path(executable)
        .error_msg(format!("lipo -info failed for {}", executable.display()))
        .run()
        .map_err(|e| Error::InspectionFailed(format!("{e:#}")))?;

    parse_lipo_info(result.stdout_trimmed())
        .ok_or_else(|| {
            Error::InspectionFailed(format!(
                "unrecognized lipo output: {}",
                result.stdout_trimmed()
            ))
        })
}

/// Parse one line of `lipo -info` output into an architecture set.
///
/// Returns None when the line matches neither the fat nor the thin form.
pub fn parse_lipo_info(output: &str) -> Option<BTreeSet<String>> {
    if let Some(archs) = output.split("are: ").nth(1) {
        let set: BTreeSet<String> = archs.split_whitespace().map(str::to_string).collect();
        if !set.is_empty() {
            return Some(set);
        }
    }

    if let Some(arch) = output.split("is architecture: ").nth(1) {
        let arch = arch.trim();
        if !arch.is_empty() && !arch.contains(char::is_whitespace) {
            return Some(BTreeSet::from([arch.to_string()]));
        }
    }

    None
}

/// Remove one slice from a binary in place.
///
/// Each call operates on the binary's then-current state; excess slices are
/// removed one per call, sequentially.
pub fn strip(executable: &Path, architecture: &str) -> Result<()> {
    Cmd::new("lipo")
        .arg("-remove")
        .arg(architecture)
        .arg("-output")
        .arg_path(executable)
        .arg_path(executable)
        .error_msg(format!("lipo -remove {architecture} failed"))
        .run()
        .map_err(|e| Error::StripFailed {
            architecture: architecture.to_string(),
            reason: format!("{e:#}"),
        })?;
    Ok(())
}
