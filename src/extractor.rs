use crate::compare::files_identical;
use crate::config::Settings;
use crate::copy::copy_verbatim;
use crate::copyright::{CopyrightRewriter, CopyrightSettings, ExportOutcome};
use crate::errors::Result;
use crate::exclusions::ExclusionSets;
use crate::output_dir::{prepare_output_dir, validate_layout};
use crate::output_formatter::ReportFormatter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Subdirectory of the output root that receives tree A's side of each difference.
pub const ORIGINAL_DIR: &str = "Original";
/// Subdirectory of the output root that receives tree B's side of each difference.
pub const MODIFIED_DIR: &str = "Modified";

/// Why a file ended up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Present in both trees with different bytes.
    Modified,
    /// Present in tree A only.
    OnlyInA,
    /// Present in tree B only.
    OnlyInB,
}

impl FileStatus {
    /// The tag printed in verbose mode.
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Modified => "Modified",
            FileStatus::OnlyInA => "Only in A",
            FileStatus::OnlyInB => "Only in B",
        }
    }
}

/// One file written to the output trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub status: FileStatus,
    pub relative_path: PathBuf,
    /// How the Modified copy was produced when copyright rewriting is on.
    pub rewrite: Option<ExportOutcome>,
}

/// Everything a run did, in the order it did it.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub files: Vec<ExtractedFile>,
    /// Files of tree A that took part in the comparison.
    pub compared: usize,
    /// Files of tree A with a byte-identical counterpart in tree B.
    pub identical: usize,
    /// Excluded files and pruned directories, across both walks.
    pub excluded: usize,
}

impl ExtractionReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// Files whose Modified copy had at least one copyright line rewritten.
    pub fn rewritten(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.rewrite, Some(ExportOutcome::Rewritten { .. })))
            .count()
    }
}

/// Walks two trees and copies their differences into `Original/` and `Modified/`.
pub struct Extractor {
    exclusions: ExclusionSets,
    rewriter: Option<CopyrightRewriter>,
    verbose: bool,
}

impl Extractor {
    /// Creates an extractor. Pass `None` for `copyright` to copy Modified files verbatim.
    pub fn new(
        exclusions: ExclusionSets,
        copyright: Option<CopyrightSettings>,
        verbose: bool,
    ) -> Result<Self> {
        let rewriter = copyright.map(CopyrightRewriter::new).transpose()?;
        Ok(Self {
            exclusions,
            rewriter,
            verbose,
        })
    }

    /// Runs both passes and returns what was extracted.
    ///
    /// Pass one walks `tree_a`: a file whose counterpart in `tree_b` is missing or
    /// differs is copied to `Original/`, and the counterpart, when present, to
    /// `Modified/`. Pass two walks `tree_b` and copies files missing from
    /// `tree_a` to `Modified/`.
    pub fn extract(&self, tree_a: &Path, tree_b: &Path, output_root: &Path) -> Result<ExtractionReport> {
        let original_dir = output_root.join(ORIGINAL_DIR);
        let modified_dir = output_root.join(MODIFIED_DIR);
        let mut report = ExtractionReport::default();

        let (files_a, excluded_a) = self.collect_files(tree_a);
        report.excluded += excluded_a;

        for rel in files_a {
            report.compared += 1;
            let path_a = tree_a.join(&rel);
            let path_b = tree_b.join(&rel);
            let has_counterpart = path_b.is_file();

            if has_counterpart && files_identical(&path_a, &path_b)? {
                report.identical += 1;
                continue;
            }

            copy_verbatim(&path_a, &original_dir.join(&rel))?;

            if has_counterpart {
                let rewrite = self.export_modified(&path_b, &modified_dir.join(&rel))?;
                self.record(&mut report, FileStatus::Modified, rel, rewrite);
            } else {
                self.record(&mut report, FileStatus::OnlyInA, rel, None);
            }
        }

        let (files_b, excluded_b) = self.collect_files(tree_b);
        report.excluded += excluded_b;

        for rel in files_b {
            if tree_a.join(&rel).is_file() {
                continue;
            }

            let rewrite = self.export_modified(&tree_b.join(&rel), &modified_dir.join(&rel))?;
            self.record(&mut report, FileStatus::OnlyInB, rel, rewrite);
        }

        Ok(report)
    }

    /// Collects the relative paths of all non-excluded files under `root`, sorted by name.
    ///
    /// Returns the files and the number of excluded files and pruned directories.
    fn collect_files(&self, root: &Path) -> (Vec<PathBuf>, usize) {
        let mut files = Vec::new();
        let mut excluded = 0;
        let mut pruned = 0;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let prune = e.depth() > 0
                    && e.file_type().is_dir()
                    && self.exclusions.prunes_dir(&e.file_name().to_string_lossy());
                if prune {
                    debug!("Pruned excluded directory {}", e.path().display());
                    pruned += 1;
                }
                !prune
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            // Symlinks count when they resolve to a regular file.
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let rel_dir = rel.parent().unwrap_or_else(|| Path::new(""));
            let file_name = entry.file_name().to_string_lossy();

            if self.exclusions.excludes(rel_dir, &file_name) {
                debug!("Excluded {}", rel.display());
                excluded += 1;
                continue;
            }

            files.push(rel.to_path_buf());
        }

        (files, excluded + pruned)
    }

    /// Writes a tree-B file to the Modified side, rewriting copyright stamps when enabled.
    fn export_modified(&self, src: &Path, dest: &Path) -> Result<Option<ExportOutcome>> {
        match &self.rewriter {
            Some(rewriter) => Ok(Some(rewriter.export(src, dest)?)),
            None => {
                copy_verbatim(src, dest)?;
                Ok(None)
            }
        }
    }

    fn record(
        &self,
        report: &mut ExtractionReport,
        status: FileStatus,
        relative_path: PathBuf,
        rewrite: Option<ExportOutcome>,
    ) {
        if self.verbose {
            println!("[{}] {}", status.label(), relative_path.display());
        }
        report.files.push(ExtractedFile {
            status,
            relative_path,
            rewrite,
        });
    }
}

/// The main entry point for a comparison run.
///
/// This function orchestrates the entire run:
/// 1. It checks that the trees exist and that the output root cannot clobber them.
/// 2. It prepares the output root (wiped and recreated when cleanup is on).
/// 3. It runs both extraction passes.
/// 4. It writes the optional report and prints summary statistics.
pub fn run_extract(settings: &Settings) -> Result<ExtractionReport> {
    validate_layout(
        &settings.folder_a,
        &settings.folder_b,
        &settings.output_root,
        &settings.exclusions,
    )?;

    if settings.cleanup_output {
        prepare_output_dir(&settings.output_root, settings.verbose)?;
    } else {
        fs::create_dir_all(&settings.output_root)?;
    }

    info!(
        "Comparing {} against {}",
        settings.folder_a.display(),
        settings.folder_b.display()
    );

    let extractor = Extractor::new(
        settings.exclusions.clone(),
        settings.copyright.clone(),
        settings.verbose,
    )?;
    let report = extractor.extract(&settings.folder_a, &settings.folder_b, &settings.output_root)?;

    if let Some(target) = &settings.report {
        ReportFormatter::new(target.format).write_to_path(&target.path, &report)?;
        info!("Report written to {}", target.path.display());
    }

    println!("\n{}", "-".repeat(50));
    println!("Files compared : {}", report.compared);
    println!("Identical      : {}", report.identical);
    println!("Modified       : {}", report.count(FileStatus::Modified));
    println!("Only in A      : {}", report.count(FileStatus::OnlyInA));
    println!("Only in B      : {}", report.count(FileStatus::OnlyInB));
    println!("Excluded       : {}", report.excluded);
    if settings.copyright.is_some() {
        println!("Rewritten      : {}", report.rewritten());
    }

    Ok(report)
}
