//! # Chart Files
//!
//! Splits an UltraStar `.txt` file into its header and body, and regenerates
//! a file from an edited body.
//!
//! ## File Shape
//! ```text
//! #TITLE:Song            header, any order
//! #BPM:300
//! #GAP:97048             delay before beat 0, in milliseconds
//!                        blank separator
//! : 0 4 5 Hel            body: notes, breaks, end marker
//! - 8
//! E
//! ```
//!
//! ## Regeneration
//! Header keys are written back in their original order. `TITLE`, `LANGUAGE`
//! and `GAP` come from the live [`Metadata`] instead of the stored text; a
//! zero GAP is omitted and a non-zero GAP missing from the original header is
//! appended after the other keys.

use serde::Serialize;

use crate::line::{
    is_end_line, is_header_line, parse_float_prefix, parse_header_line, parse_int_prefix,
    END_MARKER, HEADER_PREFIX,
};
use crate::time::{ms_to_components, TimeComponents};

pub const FILE_EXTENSION: &str = ".txt";
pub const DEFAULT_FILE_STEM: &str = "song";

const TITLE_KEY: &str = "TITLE";
const LANGUAGE_KEY: &str = "LANGUAGE";
const GAP_KEY: &str = "GAP";
const BPM_KEY: &str = "BPM";

/// Ordered header fields. Keys are unique and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: Vec<(String, String)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed chart file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chart {
    pub header: Header,
    /// Body lines, verbatim, blank lines removed.
    pub note_lines: Vec<String>,
}

/// Editable metadata derived from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub language: String,
    /// `None` when the stored GAP is not a number.
    pub gap: Option<TimeComponents>,
}

impl Metadata {
    pub fn gap_ms(&self) -> Option<i64> {
        self.gap.map(TimeComponents::to_ms)
    }
}

/// Split file content into header fields and body lines.
///
/// Accepts `\n` and `\r\n` line endings. Header-looking lines without a
/// `KEY:VALUE` pair are dropped.
pub fn parse_file(content: &str) -> Chart {
    let mut chart = Chart::default();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_header_line(line) {
            if let Some((key, value)) = parse_header_line(line) {
                chart.header.insert(key, value);
            }
        } else if !line.trim().is_empty() {
            chart.note_lines.push(line.to_string());
        }
    }

    log::debug!(
        "Parsed chart: {} header fields, {} body lines",
        chart.header.len(),
        chart.note_lines.len()
    );
    chart
}

/// Render a chart file from its original header, the live metadata and the
/// edited body lines.
pub fn generate_file<S: AsRef<str>>(header: &Header, metadata: &Metadata, lines: &[S]) -> String {
    let gap_ms = metadata.gap_ms();
    let mut out: Vec<String> = Vec::with_capacity(header.len() + lines.len() + 2);

    for (key, value) in header.iter() {
        let value = match key {
            TITLE_KEY => metadata.title.clone(),
            LANGUAGE_KEY => metadata.language.clone(),
            GAP_KEY => match gap_ms {
                Some(0) => continue,
                Some(ms) => ms.to_string(),
                None => value.to_string(),
            },
            _ => value.to_string(),
        };
        out.push(format!("{HEADER_PREFIX}{key}:{value}"));
    }

    if !header.contains_key(GAP_KEY) {
        if let Some(ms) = gap_ms.filter(|ms| *ms != 0) {
            out.push(format!("{HEADER_PREFIX}{GAP_KEY}:{ms}"));
        }
    }

    out.push(String::new());

    for line in lines {
        let line = line.as_ref();
        if is_end_line(line) {
            out.push(END_MARKER.to_string());
        } else {
            out.push(line.to_string());
        }
    }

    out.join("\n")
}

/// First value of `#KEY:` anywhere in raw content, trimmed.
pub fn extract_metadata(content: &str, key: &str, default: &str) -> String {
    let tag = format!("{HEADER_PREFIX}{key}:");
    content
        .lines()
        .find_map(|line| {
            let start = line.find(&tag)? + tag.len();
            let value = &line[start..];
            (!value.is_empty()).then(|| value.trim().to_string())
        })
        .unwrap_or_else(|| default.to_string())
}

/// GAP as time components. A missing or empty GAP is zero; a value with no
/// leading integer is unknown.
pub fn parse_gap_from_header(header: &Header) -> Option<TimeComponents> {
    let raw = header.get(GAP_KEY).filter(|v| !v.is_empty()).unwrap_or("0");
    parse_int_prefix(raw).map(ms_to_components)
}

pub fn parse_metadata(header: &Header) -> Metadata {
    Metadata {
        title: header.get(TITLE_KEY).unwrap_or_default().to_string(),
        language: header.get(LANGUAGE_KEY).unwrap_or_default().to_string(),
        gap: parse_gap_from_header(header),
    }
}

pub fn header_bpm(header: &Header) -> Option<f64> {
    header.get(BPM_KEY).and_then(parse_float_prefix)
}

/// Stored GAP in milliseconds for timing display; unknown counts as zero.
pub fn header_gap_ms(header: &Header) -> f64 {
    header
        .get(GAP_KEY)
        .and_then(parse_float_prefix)
        .unwrap_or(0.0)
}

/// Output name for an edited chart: `{TITLE}{suffix}.txt`.
pub fn adjusted_file_name(header: &Header, suffix: &str) -> String {
    let stem = header
        .get(TITLE_KEY)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_FILE_STEM);
    format!("{stem}{suffix}{FILE_EXTENSION}")
}
