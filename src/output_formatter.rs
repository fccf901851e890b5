use crate::copy::ensure_parent;
use crate::copyright::ExportOutcome;
use crate::errors::Result;
use crate::extractor::{ExtractedFile, ExtractionReport, FileStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Defines the possible formats for the run report.
///
/// The same names select a format on the CLI and in the config file.
#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// One line per extracted file followed by a summary.
    #[default]
    Text,
    /// JSON format, suitable for machine processing.
    Json,
    /// Comma-Separated Values format.
    Csv,
}

/// Handles the formatting of an `ExtractionReport` into the report formats.
pub struct ReportFormatter {
    format: ReportFormat,
    tool_name: String,
    tool_version: String,
}

impl ReportFormatter {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Writes the formatted report to `path`, replacing any previous report.
    pub fn write_to_path(&self, path: &Path, report: &ExtractionReport) -> Result<()> {
        let output = self.format(report)?;
        ensure_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn format(&self, report: &ExtractionReport) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(self.format_text(report)),
            ReportFormat::Json => self.format_json(report),
            ReportFormat::Csv => self.format_csv(report),
        }
    }

    fn format_text(&self, report: &ExtractionReport) -> String {
        let mut output = String::new();

        for f in &report.files {
            output.push_str(&format!("[{}] {}", f.status.label(), f.relative_path.display()));
            if let Some(rewrite) = rewrite_label(f.rewrite) {
                output.push_str(&format!(" ({rewrite})"));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{} files compared, {} identical, {} modified, {} only in A, {} only in B, {} excluded\n",
            report.compared,
            report.identical,
            report.count(FileStatus::Modified),
            report.count(FileStatus::OnlyInA),
            report.count(FileStatus::OnlyInB),
            report.excluded,
        ));

        output
    }

    fn format_json(&self, report: &ExtractionReport) -> Result<String> {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            tool: ToolInfo<'a>,
            run_time: DateTime<Utc>,
            summary: Summary,
            files: Vec<JsonFile<'a>>,
        }

        #[derive(Serialize)]
        struct ToolInfo<'a> {
            name: &'a str,
            version: &'a str,
        }

        #[derive(Serialize)]
        struct Summary {
            compared: usize,
            identical: usize,
            modified: usize,
            only_in_a: usize,
            only_in_b: usize,
            excluded: usize,
            rewritten: usize,
        }

        #[derive(Serialize)]
        struct JsonFile<'a> {
            status: FileStatus,
            path: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            copyright: Option<&'a str>,
        }

        let files = report
            .files
            .iter()
            .map(|f: &ExtractedFile| JsonFile {
                status: f.status,
                path: portable_path(&f.relative_path),
                copyright: rewrite_label(f.rewrite),
            })
            .collect();

        let output = JsonOutput {
            tool: ToolInfo {
                name: &self.tool_name,
                version: &self.tool_version,
            },
            run_time: Utc::now(),
            summary: Summary {
                compared: report.compared,
                identical: report.identical,
                modified: report.count(FileStatus::Modified),
                only_in_a: report.count(FileStatus::OnlyInA),
                only_in_b: report.count(FileStatus::OnlyInB),
                excluded: report.excluded,
                rewritten: report.rewritten(),
            },
            files,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_csv(&self, report: &ExtractionReport) -> Result<String> {
        use csv::Writer;

        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(["Status", "Path", "Copyright"])?;

        for f in &report.files {
            let path = portable_path(&f.relative_path);
            wtr.write_record([
                f.status.label(),
                path.as_str(),
                rewrite_label(f.rewrite).unwrap_or(""),
            ])?;
        }

        let data = wtr.into_inner().map_err(|e| format!("CSV writer error: {e}"))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

/// Relative paths are reported with `/` separators on every platform.
fn portable_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn rewrite_label(outcome: Option<ExportOutcome>) -> Option<&'static str> {
    outcome.map(|o| match o {
        ExportOutcome::Rewritten { .. } => "rewritten",
        ExportOutcome::Unchanged => "unchanged",
        ExportOutcome::RawCopy => "raw copy",
    })
}
