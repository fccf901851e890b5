//! `diffex` extracts the files that differ between two directory trees.
//!
//! It provides the core logic for the `diffex` command-line tool but can also be
//! used as a library. The main components are:
//!
//! - `Extractor`: walks tree A and tree B and copies every differing or
//!   one-sided file into `Original/` and `Modified/` under an output root.
//! - `CopyrightRewriter`: rewrites copyright year stamps in text files written
//!   to the `Modified/` side, falling back to a verbatim copy for anything that
//!   is not UTF-8 text.
//! - `exclusions`: directory, file name and extension exclusion sets.
//! - `config`: loads the YAML configuration file and merges it with CLI flags.
//! - `output_formatter`: writes a text, JSON or CSV report of a run.
//!
//! A run is single-threaded: pass A→B finishes before pass B→A starts.

pub mod cli;
pub mod compare;
pub mod config;
pub mod copy;
pub mod copyright;
pub mod errors;
pub mod exclusions;
pub mod extractor;
pub mod logger;
pub mod output_dir;
pub mod output_formatter;

// Re-export main types for easier access by library users.
pub use config::{ConfigLoader, Settings};
pub use copyright::{CopyrightFormat, CopyrightRewriter, CopyrightSettings, YearPolicy};
pub use errors::{Error, Result};
pub use exclusions::{ExclusionSets, should_exclude};
pub use extractor::{ExtractionReport, Extractor, FileStatus, run_extract};
pub use output_formatter::{ReportFormat, ReportFormatter};
