use crate::copy::{copy_verbatim, write_atomic};
use crate::errors::Result;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The holder text that follows the year in a recognized copyright line.
pub const DEFAULT_HOLDER: &str = "Insyde Software Corp. All Rights Reserved.";

/// The textual shape a rewritten copyright line takes.
#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CopyrightFormat {
    /// `Copyright (c) 2026, <holder>`
    #[default]
    Legacy,
    /// `Copyright 2026 <holder>` (no `(c)`, no comma).
    Compact,
}

/// When a recognized copyright line is rewritten.
#[derive(clap::ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum YearPolicy {
    /// Normalize every match to the target year and format.
    #[default]
    Always,
    /// Leave a match alone when its year already equals the target year.
    SkipCurrent,
}

/// Everything the rewriter needs, including the year it stamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightSettings {
    pub format: CopyrightFormat,
    pub policy: YearPolicy,
    pub year: i32,
    pub holder: String,
}

impl CopyrightSettings {
    pub fn new(format: CopyrightFormat, policy: YearPolicy, year: i32) -> Self {
        Self {
            format,
            policy,
            year,
            holder: DEFAULT_HOLDER.to_string(),
        }
    }

    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = holder.into();
        self
    }
}

/// How a file reached the Modified side when rewriting is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Decoded as text and at least one copyright line was rewritten.
    Rewritten { replacements: usize },
    /// Decoded as text; nothing needed rewriting.
    Unchanged,
    /// Text handling failed and the bytes were copied as-is.
    RawCopy,
}

/// Matches copyright stamps and rewrites them to the configured year and format.
///
/// The recognized shape is `Copyright`, an optional `(c)`, an optional
/// `YYYY -` range start, the year, and the holder text. Between year and holder
/// only a comma may be followed by a line break.
pub struct CopyrightRewriter {
    regex: Regex,
    settings: CopyrightSettings,
}

impl CopyrightRewriter {
    pub fn new(settings: CopyrightSettings) -> Result<Self> {
        let pattern = format!(
            r"Copyright\s*(?:\(c\)\s*)?(?:\d{{4}}\s*-\s*)?(?P<year>\d{{4}})(?:,\s*|[ \t]+)?{}",
            regex::escape(&settings.holder)
        );

        Ok(Self {
            regex: Regex::new(&pattern)?,
            settings,
        })
    }

    pub fn settings(&self) -> &CopyrightSettings {
        &self.settings
    }

    /// Rewrites every copyright stamp in `content`.
    ///
    /// Bytes outside the matched spans are returned untouched. Content without a
    /// match is borrowed back unchanged.
    pub fn rewrite<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.regex
            .replace_all(content, |caps: &Captures| self.replacement_for(caps))
    }

    /// Counts the stamps that `rewrite` would change.
    pub fn count_rewrites(&self, content: &str) -> usize {
        self.regex
            .captures_iter(content)
            .filter(|caps| self.replacement_for(caps) != caps[0])
            .count()
    }

    fn replacement_for(&self, caps: &Captures) -> String {
        if self.settings.policy == YearPolicy::SkipCurrent
            && caps["year"].parse::<i32>().ok() == Some(self.settings.year)
        {
            return caps[0].to_string();
        }

        match self.settings.format {
            CopyrightFormat::Legacy => {
                format!("Copyright (c) {}, {}", self.settings.year, self.settings.holder)
            }
            CopyrightFormat::Compact => {
                format!("Copyright {} {}", self.settings.year, self.settings.holder)
            }
        }
    }

    /// Writes `src` to `dest`, rewriting copyright stamps on the way.
    ///
    /// Any failure while handling the file as text (it is not UTF-8, a read or
    /// write error) falls back to a verbatim copy. Only a failure of that
    /// fallback copy is returned as an error.
    pub fn export(&self, src: &Path, dest: &Path) -> Result<ExportOutcome> {
        match self.export_text(src, dest) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                debug!("Copying {} verbatim: {}", src.display(), e);
                copy_verbatim(src, dest)?;
                Ok(ExportOutcome::RawCopy)
            }
        }
    }

    fn export_text(&self, src: &Path, dest: &Path) -> Result<ExportOutcome> {
        let content = String::from_utf8(fs::read(src)?)?;
        let replacements = self.count_rewrites(&content);

        if replacements == 0 {
            copy_verbatim(src, dest)?;
            return Ok(ExportOutcome::Unchanged);
        }

        let rewritten = self.rewrite(&content);
        write_atomic(dest, rewritten.as_bytes(), src)?;
        Ok(ExportOutcome::Rewritten { replacements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOLDER: &str = "Insyde Software Corp. All Rights Reserved.";

    fn rewriter(format: CopyrightFormat, policy: YearPolicy) -> CopyrightRewriter {
        CopyrightRewriter::new(CopyrightSettings::new(format, policy, 2026)).unwrap()
    }

    #[test]
    fn test_legacy_rewrite_table() {
        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        let cases = [
            (
                "Copyright (c) 2013 - 2020, Insyde Software Corp. All Rights Reserved.",
                "Copyright (c) 2026, Insyde Software Corp. All Rights Reserved.",
            ),
            (
                "Copyright (c) 2020, Insyde Software Corp. All Rights Reserved.",
                "Copyright (c) 2026, Insyde Software Corp. All Rights Reserved.",
            ),
            (
                "Copyright 2019 Insyde Software Corp. All Rights Reserved.",
                "Copyright (c) 2026, Insyde Software Corp. All Rights Reserved.",
            ),
            (
                ";; Copyright (c) 2013-2024,Insyde Software Corp. All Rights Reserved.",
                ";; Copyright (c) 2026, Insyde Software Corp. All Rights Reserved.",
            ),
            (
                "Copyright (c) 2020, Other Corp. All Rights Reserved.",
                "Copyright (c) 2020, Other Corp. All Rights Reserved.",
            ),
            ("no stamp here", "no stamp here"),
        ];

        for (input, expected) in cases {
            assert_eq!(r.rewrite(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_compact_rewrite_table() {
        let r = rewriter(CopyrightFormat::Compact, YearPolicy::Always);
        let cases = [
            (
                "Copyright (c) 2013 - 2020, Insyde Software Corp. All Rights Reserved.",
                "Copyright 2026 Insyde Software Corp. All Rights Reserved.",
            ),
            (
                " * Copyright (c) 2024, Insyde Software Corp. All Rights Reserved.",
                " * Copyright 2026 Insyde Software Corp. All Rights Reserved.",
            ),
            (
                "Copyright 2026 Insyde Software Corp. All Rights Reserved.",
                "Copyright 2026 Insyde Software Corp. All Rights Reserved.",
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(r.rewrite(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_surrounding_content_preserved_and_every_match_rewritten() {
        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        let content = format!(
            "/** @file\r\n  Copyright (c) 2015 - 2021, {HOLDER}\r\n**/\r\n\r\n// Copyright (c) 2022, {HOLDER}\r\nint x;\r\n"
        );
        let expected = format!(
            "/** @file\r\n  Copyright (c) 2026, {HOLDER}\r\n**/\r\n\r\n// Copyright (c) 2026, {HOLDER}\r\nint x;\r\n"
        );

        assert_eq!(r.rewrite(&content), expected);
        assert_eq!(r.count_rewrites(&content), 2);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        for format in [CopyrightFormat::Legacy, CopyrightFormat::Compact] {
            for policy in [YearPolicy::Always, YearPolicy::SkipCurrent] {
                let r = rewriter(format, policy);
                let input = format!("Copyright (c) 2013 - 2020, {HOLDER}\nCopyright 2026 {HOLDER}\n");

                let once = r.rewrite(&input).into_owned();
                let twice = r.rewrite(&once).into_owned();
                assert_eq!(once, twice, "{format:?} / {policy:?}");
            }
        }
    }

    #[test]
    fn test_skip_current_leaves_current_year_alone() {
        let r = rewriter(CopyrightFormat::Compact, YearPolicy::SkipCurrent);
        let current = format!("Copyright (c) 2013 - 2026, {HOLDER}");
        let stale = format!("Copyright (c) 2013 - 2025, {HOLDER}");

        assert_eq!(r.rewrite(&current), current);
        assert_eq!(r.count_rewrites(&current), 0);
        assert_eq!(r.rewrite(&stale), format!("Copyright 2026 {HOLDER}"));
    }

    #[test]
    fn test_match_does_not_join_lines_without_comma() {
        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        let split = format!("Copyright 2020\n\n{HOLDER}\n");
        let tab = format!("Copyright 2020\t{HOLDER}\n");
        let comma_wrapped = format!("Copyright (c) 2020,\n  {HOLDER}\n");

        assert_eq!(r.rewrite(&split), split);
        assert_eq!(r.rewrite(&tab), format!("Copyright (c) 2026, {HOLDER}\n"));
        assert_eq!(r.rewrite(&comma_wrapped), format!("Copyright (c) 2026, {HOLDER}\n"));
    }

    #[test]
    fn test_no_match_borrows_content() {
        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        assert!(matches!(r.rewrite("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_custom_holder_is_matched_literally() {
        let settings = CopyrightSettings::new(CopyrightFormat::Legacy, YearPolicy::Always, 2030)
            .with_holder("Acme (Intl.) Inc.");
        let r = CopyrightRewriter::new(settings).unwrap();

        assert_eq!(
            r.rewrite("Copyright 2001 Acme (Intl.) Inc."),
            "Copyright (c) 2030, Acme (Intl.) Inc."
        );
        assert_eq!(r.rewrite("Copyright 2001 Acme XIntlX Inc."), "Copyright 2001 Acme XIntlX Inc.");
    }

    #[test]
    fn test_export_rewrites_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("license.txt");
        fs::write(&src, format!("Copyright (c) 2013 - 2020, {HOLDER}\n")).unwrap();
        let dest = temp_dir.path().join("Modified").join("license.txt");

        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        let outcome = r.export(&src, &dest).unwrap();

        assert_eq!(outcome, ExportOutcome::Rewritten { replacements: 1 });
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            format!("Copyright (c) 2026, {HOLDER}\n")
        );
    }

    #[test]
    fn test_export_unchanged_text_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("main.c");
        fs::write(&src, "int main(void) { return 0; }\n").unwrap();
        let dest = temp_dir.path().join("out").join("main.c");

        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        assert_eq!(r.export(&src, &dest).unwrap(), ExportOutcome::Unchanged);
        assert_eq!(fs::read(&dest).unwrap(), fs::read(&src).unwrap());
    }

    #[test]
    fn test_export_non_utf8_falls_back_to_raw_copy() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("logo.bmp");
        let mut bytes = b"Copyright (c) 2020, ".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00, 0x80]);
        bytes.extend_from_slice(HOLDER.as_bytes());
        fs::write(&src, &bytes).unwrap();
        let dest = temp_dir.path().join("out").join("logo.bmp");

        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);
        assert_eq!(r.export(&src, &dest).unwrap(), ExportOutcome::RawCopy);
        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_export_missing_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let r = rewriter(CopyrightFormat::Legacy, YearPolicy::Always);

        let result = r.export(
            &temp_dir.path().join("gone.txt"),
            &temp_dir.path().join("out").join("gone.txt"),
        );
        assert!(result.is_err());
    }
}
