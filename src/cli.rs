use crate::copyright::YearPolicy;
use crate::output_formatter::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// The configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "./SmallVersion.yaml";

/// Compare two folders and extract the differing files.
///
/// Every file that differs between `FOLDER_A` and `FOLDER_B` is copied into
/// `<output-root>/Original` (the A side) and `<output-root>/Modified` (the B
/// side), keeping its relative path. Files found on one side only are
/// extracted to that side alone.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Compare two folders and extract differences with auto-cleanup and copyright support",
    after_help = "EXAMPLES:
  diffex ./v1 ./v2 -u -n
  diffex ./v1 ./v2 --config config.yaml
  diffex ./v1 ./v2 --exclude-dirs .git Build --exclude-exts .log .tmp -v

CONFIG FILE (YAML):
  exclude_dirs:
    - .git
    - __pycache__
  exclude_files:
    - README.md
    - LICENSE
  exclude_exts:
    - .log
    - .tmp
  verbose: true
  output_root: ./diff_output
  update_copyright: true
  copyright_format: compact        # or legacy
  copyright_policy: skip_current   # or always
  cleanup_output: true"
)]
pub struct Args {
    /// Path to source folder A.
    pub folder_a: PathBuf,

    /// Path to target folder B.
    pub folder_b: PathBuf,

    /// Path to the YAML config file. A missing file means an empty config.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Root output folder [default: ./MyDiffOutput].
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// Print one line per extracted file.
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable copyright year update on files written to Modified.
    #[arg(short, long)]
    pub update_copyright: bool,

    /// Format: 'Copyright 2026 Insyde...' (no (c), no comma).
    #[arg(short, long)]
    pub new_copyright_format: bool,

    /// Which copyright lines get rewritten.
    #[arg(long, value_enum)]
    pub copyright_policy: Option<YearPolicy>,

    /// Year stamped into rewritten copyright lines [default: current year].
    #[arg(long, env = "DIFFEX_COPYRIGHT_YEAR")]
    pub copyright_year: Option<i32>,

    /// Keep an existing output root instead of deleting it first.
    #[arg(long)]
    pub no_cleanup: bool,

    /// Folder names to exclude.
    #[arg(long, num_args = 0..)]
    pub exclude_dirs: Option<Vec<String>>,

    /// File names to exclude.
    #[arg(long, num_args = 0..)]
    pub exclude_files: Option<Vec<String>>,

    /// File extensions to exclude, dot included (e.g. .log).
    #[arg(long, num_args = 0..)]
    pub exclude_exts: Option<Vec<String>>,

    /// Write a listing of every extracted file to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Format of the report file.
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
