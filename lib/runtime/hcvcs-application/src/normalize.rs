//! Turns line-oriented CLI text into fixed-width records.
//!
//! Nothing here fails on odd input: short lines are padded with empty
//! fields and blank lines become empty records.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use hcvcs_domain::Record;

static ANY_LINE: LazyLock<LineFilter> =
    LazyLock::new(|| LineFilter::new(r"^[^\n]*").expect("built-in line filter"));
static NON_COMMENT: LazyLock<LineFilter> =
    LazyLock::new(|| LineFilter::new(r"^[^#\n].*").expect("built-in line filter"));
static WORD_START: LazyLock<LineFilter> =
    LazyLock::new(|| LineFilter::new(r"^\w.*").expect("built-in line filter"));

/// Selects the lines of interest. The pattern is applied in multi-line
/// mode, so `^` anchors at every line start.
#[derive(Debug, Clone)]
pub struct LineFilter {
    regex: Regex,
}

impl LineFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
        Ok(Self { regex })
    }

    pub fn any_line() -> &'static Self {
        &ANY_LINE
    }

    /// Everything except `#` comment headers.
    pub fn non_comment() -> &'static Self {
        &NON_COMMENT
    }

    /// Lines starting with a word character; skips headers and separators.
    pub fn word_start() -> &'static Self {
        &WORD_START
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Matched lines as opaque strings.
pub fn lines(text: &str, filter: &LineFilter) -> Vec<String> {
    filter
        .regex
        .find_iter(text)
        .map(|found| found.as_str().trim_end_matches('\r').to_string())
        .collect()
}

/// Splits `line` on whitespace into at most `columns` fields, the last one
/// keeping any embedded whitespace, then pads to exactly `columns`.
pub fn split_padded(line: &str, columns: usize) -> Vec<String> {
    let mut fields = Vec::with_capacity(columns);
    let mut rest = line.trim_start();
    while fields.len() + 1 < columns && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }
    let rest = rest.trim_end();
    if columns > 0 && !rest.is_empty() {
        fields.push(rest.to_string());
    }
    fields.resize(columns, String::new());
    fields
}

/// Runtime-width variant: with `columns == 0` every matched line is a
/// single field.
pub fn normalize(text: &str, filter: &LineFilter, columns: usize) -> Vec<Vec<String>> {
    lines(text, filter)
        .into_iter()
        .map(|line| {
            if columns == 0 {
                vec![line]
            } else {
                split_padded(&line, columns)
            }
        })
        .collect()
}

pub fn records<const N: usize>(text: &str, filter: &LineFilter) -> Vec<Record<N>> {
    lines(text, filter)
        .iter()
        .map(|line| Record::from_parts(split_padded(line, N)))
        .collect()
}

/// Whitespace tokens per matched line, without a fixed width.
pub fn tokens(text: &str, filter: &LineFilter) -> Vec<Vec<String>> {
    lines(text, filter)
        .iter()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}
