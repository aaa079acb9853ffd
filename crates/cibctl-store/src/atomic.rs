//! Whole-file replacement through a sibling temp file

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("cib"));
    name.push(".cibctl-tmp");
    target.with_file_name(name)
}

/// Replace `target` with `content`
///
/// Readers see either the old or the new document, never a partial one.
/// The temp file is removed if the rename fails.
///
/// # Errors
///
/// `Io` if the temp file cannot be written or renamed over `target`.
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target);

    fs::write(&temp_path, content).map_err(|e| io_error("write_cib_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("rename_cib_temp", e));
    }

    tracing::debug!(path = %target.display(), bytes = content.len(), "cib written");
    Ok(())
}
