//! # Chart Line Codec
//!
//! Classifies and decomposes the raw lines of an UltraStar `.txt` chart.
//!
//! ## Line Kinds
//! ```text
//! #TITLE:My Song        header      (#KEY:VALUE)
//! : 10 5 3 Hel          note        (kind start duration pitch text)
//! * 15 5 5 lo           golden note
//! - 20                  break       (optional beat position)
//! E                     end marker
//! ```
//!
//! ## Round-trip Fidelity
//! Note fields are kept as the raw text found between the first four spaces,
//! so `parse_note_line` followed by `build_note_line` reproduces the input
//! byte for byte, trailing spaces in the syllable included.
//!
//! Nothing in this module fails loudly: a line that cannot be decomposed
//! yields `None` and the caller decides whether to skip or blank it.

use std::fmt;

/// Number of space separators in a note line.
pub const NOTE_FIELD_COUNT: usize = 4;

/// Prefix of every header line.
pub const HEADER_PREFIX: char = '#';

/// Prefix of every break line.
pub const BREAK_PREFIX: char = '-';

/// The chart terminator.
pub const END_MARKER: &str = "E";

/// Note flavour, encoded by the leading marker character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Normal,    // :
    Golden,    // *
    Freestyle, // F
    Rap,       // R
    RapGolden, // G
}

impl NoteKind {
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            ':' => Some(NoteKind::Normal),
            '*' => Some(NoteKind::Golden),
            'F' => Some(NoteKind::Freestyle),
            'R' => Some(NoteKind::Rap),
            'G' => Some(NoteKind::RapGolden),
            _ => None,
        }
    }

    pub fn marker(self) -> char {
        match self {
            NoteKind::Normal => ':',
            NoteKind::Golden => '*',
            NoteKind::Freestyle => 'F',
            NoteKind::Rap => 'R',
            NoteKind::RapGolden => 'G',
        }
    }
}

/// The five textual fields of a note line.
///
/// Fields hold the raw text so that rebuilding is exact even for
/// zero-padded or otherwise unusual numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    pub kind: String,
    pub start: String,
    pub duration: String,
    pub pitch: String,
    pub text: String,
}

impl NoteFields {
    /// Marker-derived note kind, if the kind field is a single known marker.
    pub fn note_kind(&self) -> Option<NoteKind> {
        let mut chars = self.kind.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => NoteKind::from_marker(c),
            _ => None,
        }
    }

    pub fn start_beat(&self) -> Option<i64> {
        parse_int_prefix(&self.start)
    }

    pub fn duration_beats(&self) -> Option<i64> {
        parse_int_prefix(&self.duration)
    }

    pub fn pitch_value(&self) -> Option<i64> {
        parse_int_prefix(&self.pitch)
    }

    /// Same note with a different syllable.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Same note with a different start beat.
    pub fn with_start(&self, start: i64) -> Self {
        Self {
            start: start.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for NoteFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.kind, self.start, self.duration, self.pitch, self.text
        )
    }
}

/// A classified chart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartLine {
    Header { key: String, value: String },
    Note(NoteFields),
    Break { position: Option<i64> },
    End,
    Other { raw: String },
}

impl ChartLine {
    /// Classify a raw line (without its newline).
    ///
    /// Header lines without a usable `KEY:VALUE` pair and note-looking lines
    /// with fewer than four fields fall back to `Other`.
    pub fn parse(line: &str) -> Self {
        if is_header_line(line) {
            return match parse_header_line(line) {
                Some((key, value)) => ChartLine::Header { key, value },
                None => ChartLine::Other {
                    raw: line.to_string(),
                },
            };
        }
        if is_note_line(line) {
            return match parse_note_line(line) {
                Some(fields) => ChartLine::Note(fields),
                None => ChartLine::Other {
                    raw: line.to_string(),
                },
            };
        }
        if is_break_line(line) {
            return ChartLine::Break {
                position: parse_break_position(line),
            };
        }
        if is_end_line(line) {
            return ChartLine::End;
        }
        ChartLine::Other {
            raw: line.to_string(),
        }
    }
}

impl fmt::Display for ChartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartLine::Header { key, value } => write!(f, "{HEADER_PREFIX}{key}:{value}"),
            ChartLine::Note(fields) => write!(f, "{fields}"),
            ChartLine::Break {
                position: Some(position),
            } => write!(f, "{}", build_break_line(*position)),
            ChartLine::Break { position: None } => write!(f, "{BREAK_PREFIX}"),
            ChartLine::End => write!(f, "{END_MARKER}"),
            ChartLine::Other { raw } => write!(f, "{raw}"),
        }
    }
}

pub fn is_header_line(line: &str) -> bool {
    line.trim().starts_with(HEADER_PREFIX)
}

pub fn is_note_line(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| NoteKind::from_marker(c).is_some())
}

pub fn is_break_line(line: &str) -> bool {
    line.starts_with(BREAK_PREFIX)
}

pub fn is_end_line(line: &str) -> bool {
    line.trim() == END_MARKER
}

/// Byte offsets of the first `count` spaces, scanning left to right.
fn find_space_positions(line: &str, count: usize) -> Vec<usize> {
    line.match_indices(' ')
        .map(|(i, _)| i)
        .take(count)
        .collect()
}

/// Split a note line on its first four spaces.
///
/// Everything after the fourth space is the syllable text, kept verbatim.
pub fn parse_note_line(line: &str) -> Option<NoteFields> {
    let spaces = find_space_positions(line, NOTE_FIELD_COUNT);
    let [s1, s2, s3, s4] = spaces[..] else {
        return None;
    };

    Some(NoteFields {
        kind: line[..s1].to_string(),
        start: line[s1 + 1..s2].to_string(),
        duration: line[s2 + 1..s3].to_string(),
        pitch: line[s3 + 1..s4].to_string(),
        text: line[s4 + 1..].to_string(),
    })
}

/// Exact inverse of [`parse_note_line`].
pub fn build_note_line(fields: &NoteFields) -> String {
    fields.to_string()
}

/// Beat position carried by a break line, if any.
///
/// A bare `-` is a valid break without a position.
pub fn parse_break_position(line: &str) -> Option<i64> {
    if !is_break_line(line) {
        return None;
    }
    line.split(' ').nth(1).and_then(parse_int_prefix)
}

pub fn build_break_line(position: i64) -> String {
    format!("{BREAK_PREFIX} {position}")
}

/// Split `#KEY:VALUE` on its first colon, trimming both sides.
///
/// Colons inside the value are preserved. The key and the untrimmed value
/// must each be at least one character long.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let rest = line.trim_start().strip_prefix(HEADER_PREFIX)?;
    let (key, value) = rest.split_once(':')?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Leading integer of a string, after optional whitespace and sign.
///
/// `"97048.5"` gives `97048`, `"12abc"` gives `12`, `"abc"` gives `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Leading decimal number of a string. A decimal comma is read as a point,
/// as some charts write `#BPM:300,5`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    let bytes = normalized.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_point = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    normalized[..end].parse().ok()
}
