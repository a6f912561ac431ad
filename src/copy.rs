//! Copying a framework bundle into the build products directory.
//!
//! The copy is staged: the bundle is copied to a hidden sibling directory of
//! the target and renamed into place only once complete. A failure mid-copy
//! leaves the previous target untouched (or absent), never a half-written
//! bundle that a later build step would mistake for a finished framework.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Replace `target` with a full copy of `source`.
///
/// Framework bundles contain symlink farms (Versions/Current and friends), so
/// symlinks are recreated rather than followed.
pub fn copy_bundle(source: &Path, target: &Path) -> Result<()> {
    if !source.exists() {
        return Err(Error::CopyFailed(format!(
            "source does not exist: {}",
            source.display()
        )));
    }

    let staging = staging_dir(target)?;
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .map_err(|e| Error::CopyFailed(format!("failed to clear staging dir: {e}")))?;
    }

    if let Err(e) = copy_dir_recursive(source, &staging) {
        let _ = fs::remove_dir_all(&staging);
        return Err(Error::CopyFailed(format!(
            "copy from {} failed: {e}",
            source.display()
        )));
    }

    if target.exists() {
        if let Err(e) = fs::remove_dir_all(target) {
            let _ = fs::remove_dir_all(&staging);
            return Err(Error::CopyFailed(format!(
                "failed to remove existing target {}: {e}",
                target.display()
            )));
        }
    }

    if let Err(e) = fs::rename(&staging, target) {
        let _ = fs::remove_dir_all(&staging);
        return Err(Error::CopyFailed(format!(
            "failed to move bundle into place at {}: {e}",
            target.display()
        )));
    }

    Ok(())
}

/// Hidden staging directory next to the target, on the same filesystem so the
/// final rename is atomic.
fn staging_dir(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| Error::CopyFailed(format!("invalid target path: {}", target.display())))?;
    let parent = target
        .parent()
        .ok_or_else(|| Error::CopyFailed(format!("target has no parent: {}", target.display())))?;

    fs::create_dir_all(parent)
        .map_err(|e| Error::CopyFailed(format!("failed to create {}: {e}", parent.display())))?;

    Ok(parent.join(format!(".{}.fwcopy-staging", name.to_string_lossy())))
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dst.join(entry.file_name());

        if path.is_symlink() {
            let link_target = fs::read_link(&path)?;
            std::os::unix::fs::symlink(&link_target, &dest_path)?;
        } else if path.is_dir() {
            copy_dir_recursive(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path)?;
        }
    }

    Ok(())
}
