//! File placement helpers for the output trees.

use crate::errors::{Error, Result};
use filetime::FileTime;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Copies `src` to `dest` byte for byte, creating parent directories first.
///
/// Permissions are carried over by `fs::copy`; the modification time is
/// restored afterwards so the output looks like the source it came from.
pub fn copy_verbatim(src: &Path, dest: &Path) -> Result<u64> {
    ensure_parent(dest)?;

    let bytes = fs::copy(src, dest).map_err(|source| Error::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    })?;

    preserve_mtime(src, dest)?;
    Ok(bytes)
}

/// Writes `content` to `dest` through a temporary file in the same directory.
///
/// The source's permissions and modification time are applied before the
/// temporary file is persisted over `dest`.
pub fn write_atomic(dest: &Path, content: &[u8], metadata_from: &Path) -> Result<()> {
    let parent = ensure_parent(dest)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.flush()?;

    let perms = fs::metadata(metadata_from)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;
    preserve_mtime(metadata_from, temp_file.path())?;

    temp_file.persist(dest)?;
    Ok(())
}

/// Creates the parent directory of `path` if needed and returns it.
pub fn ensure_parent(path: &Path) -> Result<&Path> {
    let parent = path
        .parent()
        .ok_or_else(|| format!("Could not get parent directory for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    Ok(parent)
}

fn preserve_mtime(src: &Path, dest: &Path) -> Result<()> {
    let mtime = FileTime::from_last_modification_time(&fs::metadata(src)?);
    filetime::set_file_mtime(dest, mtime)?;
    Ok(())
}
