use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `diffex` application.
///
/// Only fatal conditions are represented here. Per-file copyright rewrite
/// failures never surface as an `Error`; they fall back to a verbatim copy.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The existing output root could not be removed before the run.
    #[error("Could not remove directory: {}", .path.display())]
    OutputCleanup {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A copy into the output tree failed.
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// The input trees or output root are unusable for this run.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    /// An error related to CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error that occurred converting a byte slice to a UTF-8 string.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A convenient type alias for `Result<T, diffex::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
