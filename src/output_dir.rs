use crate::errors::{Error, Result};
use crate::exclusions::ExclusionSets;
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures the output directory is fresh and empty.
///
/// An existing directory is removed and recreated. Failing to remove it is
/// fatal: the run must not continue into a possibly stale output tree.
pub fn prepare_output_dir(path: &Path, verbose: bool) -> Result<()> {
    if path.exists() {
        if verbose {
            println!("[CLEAN] Removing existing output directory: {}", path.display());
        }
        fs::remove_dir_all(path).map_err(|source| Error::OutputCleanup {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::create_dir_all(path)?;
    Ok(())
}

/// Checks that both trees are directories and that the output root is kept apart from them.
///
/// The output root may not equal or contain either tree. It may sit inside a
/// tree only below a directory that `exclusions` prunes from the walk.
pub fn validate_layout(
    folder_a: &Path,
    folder_b: &Path,
    output_root: &Path,
    exclusions: &ExclusionSets,
) -> Result<()> {
    for (label, folder) in [("folder_a", folder_a), ("folder_b", folder_b)] {
        if !folder.is_dir() {
            return Err(Error::InvalidInput(format!(
                "{label} is not a directory: {}",
                folder.display()
            )));
        }
    }

    let out = resolve(output_root)?;
    for folder in [folder_a, folder_b] {
        let tree = folder.canonicalize()?;
        let pruned_inside = out.strip_prefix(&tree).is_ok_and(|rel| {
            rel.components()
                .any(|c| exclusions.prunes_dir(&c.as_os_str().to_string_lossy()))
        });
        if pruned_inside {
            continue;
        }
        if out.starts_with(&tree) || tree.starts_with(&out) {
            return Err(Error::InvalidInput(format!(
                "output root {} overlaps input folder {}",
                output_root.display(),
                folder.display()
            )));
        }
    }

    Ok(())
}

/// Canonicalizes a path that may not exist yet.
///
/// The longest existing ancestor is canonicalized and the missing components
/// are appended unchanged.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
