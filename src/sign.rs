//! Code signing via `codesign`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::process::Cmd;

/// Re-sign a bundle with the given identity.
///
/// `--force` replaces the signature the framework shipped with; stripping
/// slices invalidates it anyway.
pub fn sign(bundle: &Path, identity: &str) -> Result<()> {
    Cmd::new("codesign")
        .arg("--force")
        .arg("--sign")
        .arg(identity)
        .arg_path(bundle)
        .error_msg(format!("codesign failed for {}", bundle.display()))
        .run()
        .map_err(|e| Error::SigningFailed(format!("{e:#}")))?;
    Ok(())
}
