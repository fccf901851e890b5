use crate::cli::Args;
use crate::copyright::{CopyrightFormat, CopyrightSettings, DEFAULT_HOLDER, YearPolicy};
use crate::errors::Result;
use crate::exclusions::ExclusionSets;
use crate::output_formatter::ReportFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The output root used when neither the CLI nor the config names one.
pub const DEFAULT_OUTPUT_ROOT: &str = "./MyDiffOutput";

/// The contents of the optional YAML configuration file.
///
/// Every key is optional. Unknown keys are ignored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,
    pub exclude_exts: Option<Vec<String>>,
    pub verbose: Option<bool>,
    pub output_root: Option<PathBuf>,
    pub update_copyright: Option<bool>,
    /// Shorthand for `copyright_format: compact`.
    pub new_copyright_format: Option<bool>,
    pub copyright_format: Option<CopyrightFormat>,
    pub copyright_policy: Option<YearPolicy>,
    pub copyright_holder: Option<String>,
    pub copyright_year: Option<i32>,
    pub cleanup_output: Option<bool>,
    pub report: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
}

/// Where and how the run report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    pub path: PathBuf,
    pub format: ReportFormat,
}

/// The resolved settings for one run, after CLI, config and defaults are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub folder_a: PathBuf,
    pub folder_b: PathBuf,
    pub output_root: PathBuf,
    pub exclusions: ExclusionSets,
    pub verbose: bool,
    pub cleanup_output: bool,
    /// `None` when copyright rewriting is disabled.
    pub copyright: Option<CopyrightSettings>,
    pub report: Option<ReportTarget>,
}

/// A utility for loading the YAML configuration file.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a `FileConfig` from `path`.
    ///
    /// A missing, unreadable or empty file yields the default (empty) config.
    /// A file that reads fine but does not parse is an error.
    pub fn load(path: &Path) -> Result<FileConfig> {
        if !path.is_file() {
            debug!("No config file at {}", path.display());
            return Ok(FileConfig::default());
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Ignoring unreadable config file {}: {}", path.display(), e);
                return Ok(FileConfig::default());
            }
        };

        Self::parse(&content)
    }

    /// Parses YAML text into a `FileConfig`. Blank or comment-only text is an empty config.
    pub fn parse(content: &str) -> Result<FileConfig> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(FileConfig::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }
}

impl Settings {
    /// Merges CLI arguments over the file config over built-in defaults.
    ///
    /// Boolean CLI flags can only switch a feature on, except `--no-cleanup`
    /// which switches cleanup off. `current_year` is used when no explicit
    /// copyright year is configured.
    pub fn resolve(args: &Args, file: FileConfig, current_year: i32) -> Result<Self> {
        let exclusions = ExclusionSets::new(
            args.exclude_dirs.clone().or(file.exclude_dirs).unwrap_or_default(),
            args.exclude_files.clone().or(file.exclude_files).unwrap_or_default(),
            args.exclude_exts.clone().or(file.exclude_exts).unwrap_or_default(),
        );

        let output_root = args
            .output_root
            .clone()
            .or(file.output_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));

        let verbose = args.verbose || file.verbose.unwrap_or(false);
        let cleanup_output = !args.no_cleanup && file.cleanup_output.unwrap_or(true);
        let update_copyright = args.update_copyright || file.update_copyright.unwrap_or(false);

        let copyright = if update_copyright {
            let format = if args.new_copyright_format {
                CopyrightFormat::Compact
            } else if let Some(format) = file.copyright_format {
                format
            } else if file.new_copyright_format.unwrap_or(false) {
                CopyrightFormat::Compact
            } else {
                CopyrightFormat::Legacy
            };
            let policy = args.copyright_policy.or(file.copyright_policy).unwrap_or_default();
            let year = args.copyright_year.or(file.copyright_year).unwrap_or(current_year);
            if !(1000..=9999).contains(&year) {
                return Err(format!("Copyright year must have four digits, got {year}").into());
            }
            let holder = file
                .copyright_holder
                .unwrap_or_else(|| DEFAULT_HOLDER.to_string());
            if holder.trim().is_empty() {
                return Err("copyright_holder must not be empty".into());
            }

            Some(CopyrightSettings::new(format, policy, year).with_holder(holder))
        } else {
            None
        };

        let report = args.report.clone().or(file.report).map(|path| ReportTarget {
            path,
            format: args.report_format.or(file.report_format).unwrap_or_default(),
        });

        Ok(Self {
            folder_a: args.folder_a.clone(),
            folder_b: args.folder_b.clone(),
            output_root,
            exclusions,
            verbose,
            cleanup_output,
            copyright,
            report,
        })
    }
}
