use std::collections::HashSet;
use std::path::Path;

/// The three membership sets that decide which files take part in a comparison.
///
/// Matching is exact string equality. Extensions carry their leading dot (`.log`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSets {
    pub dirs: HashSet<String>,
    pub files: HashSet<String>,
    pub exts: HashSet<String>,
}

impl ExclusionSets {
    pub fn new<D, F, E>(dirs: D, files: F, exts: E) -> Self
    where
        D: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            dirs: dirs.into_iter().collect(),
            files: files.into_iter().collect(),
            exts: exts.into_iter().collect(),
        }
    }

    /// Returns `true` if the file at `relative_dir/file_name` must be skipped.
    pub fn excludes(&self, relative_dir: &Path, file_name: &str) -> bool {
        should_exclude(relative_dir, file_name, &self.dirs, &self.files, &self.exts)
    }

    /// Returns `true` if a directory with this name can be pruned from a walk.
    pub fn prunes_dir(&self, dir_name: &str) -> bool {
        self.dirs.contains(dir_name)
    }
}

/// Decides whether a file is left out of the comparison.
///
/// A file is excluded when any component of `relative_dir` is in `exclude_dirs`,
/// when `file_name` is in `exclude_files`, or when its extension is in
/// `exclude_exts`.
pub fn should_exclude(
    relative_dir: &Path,
    file_name: &str,
    exclude_dirs: &HashSet<String>,
    exclude_files: &HashSet<String>,
    exclude_exts: &HashSet<String>,
) -> bool {
    let in_excluded_dir = relative_dir
        .components()
        .any(|c| exclude_dirs.contains(&*c.as_os_str().to_string_lossy()));
    if in_excluded_dir {
        return true;
    }

    if exclude_files.contains(file_name) {
        return true;
    }

    match extension_of(file_name) {
        Some(ext) => exclude_exts.contains(ext),
        None => false,
    }
}

/// Returns the extension of `file_name`, dot included.
///
/// Leading dots belong to the stem, so `.gitignore` has no extension while
/// `archive.tar.gz` has `.gz`.
pub fn extension_of(file_name: &str) -> Option<&str> {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let idx = file_name[stem_start..].rfind('.')?;
    Some(&file_name[stem_start + idx..])
}
