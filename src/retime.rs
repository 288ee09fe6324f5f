//! # Beat-Offset Retimer
//!
//! Shifts notes and breaks by user-entered beat deltas.
//!
//! Offsets are sparse and cumulative: an entry at line `i` moves line `i` and
//! everything after it, on top of every earlier entry.
//!
//! ```text
//! line  beat  offset  cumulative  result
//!    0    10      +5           5      15
//!    1    20                   5      25
//!    2    30     +10          15      45
//!    3    40                  15      55
//! ```

use std::collections::BTreeMap;

use crate::error::StarsyncError;
use crate::line::{
    build_break_line, build_note_line, is_break_line, is_note_line, parse_break_position,
    parse_int_prefix, parse_note_line,
};

/// Sparse map from chart-line index to beat delta. Absent means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap(BTreeMap<usize, i64>);

impl OffsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, index: usize, delta: i64) {
        self.0.insert(index, delta);
    }

    pub fn clear(&mut self, index: usize) {
        self.0.remove(&index);
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(&index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.0.iter().map(|(index, delta)| (*index, *delta))
    }

    /// Update an entry from raw text input: blank or non-numeric text
    /// removes the entry, anything else stores its integer value.
    pub fn set_from_input(&mut self, index: usize, raw: &str) {
        match parse_int_prefix(raw) {
            Some(delta) => self.set(index, delta),
            None => self.clear(index),
        }
    }
}

impl FromIterator<(usize, i64)> for OffsetMap {
    fn from_iter<I: IntoIterator<Item = (usize, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse an `INDEX=DELTA` argument such as `12=-4` or `3=+8`.
pub fn parse_offset_arg(arg: &str) -> Result<(usize, i64), StarsyncError> {
    let invalid = || StarsyncError::InvalidOffset(arg.to_string());

    let (index, delta) = arg.split_once('=').ok_or_else(invalid)?;
    let index = index.trim().parse::<usize>().map_err(|_| invalid())?;
    let delta = delta.trim();
    let delta = delta
        .strip_prefix('+')
        .unwrap_or(delta)
        .parse::<i64>()
        .map_err(|_| invalid())?;
    Ok((index, delta))
}

/// Whether any entry actually moves something.
pub fn has_offsets(offsets: &OffsetMap) -> bool {
    offsets.iter().any(|(_, delta)| delta != 0)
}

/// Running offset in effect at each of `len` line indices. The total
/// saturates at the `i64` bounds.
pub fn cumulative_offsets(len: usize, offsets: &OffsetMap) -> Vec<i64> {
    let mut cumulative: i64 = 0;
    (0..len)
        .map(|index| {
            cumulative = cumulative.saturating_add(offsets.get(index).unwrap_or(0));
            cumulative
        })
        .collect()
}

/// Apply cumulative beat offsets, returning a new line sequence.
///
/// Lines under a zero running offset are returned untouched, as are end
/// markers, bare breaks and anything that fails to parse. A shift that would
/// overflow the beat leaves the line untouched too.
pub fn apply_beat_offsets<S: AsRef<str>>(lines: &[S], offsets: &OffsetMap) -> Vec<String> {
    let cumulative = cumulative_offsets(lines.len(), offsets);

    lines
        .iter()
        .zip(cumulative)
        .map(|(line, offset)| shift_line(line.as_ref(), offset))
        .collect()
}

fn shift_line(line: &str, offset: i64) -> String {
    if offset == 0 {
        return line.to_string();
    }

    if is_note_line(line) {
        if let Some(fields) = parse_note_line(line) {
            if let Some(start) = fields.start_beat().and_then(|s| s.checked_add(offset)) {
                return build_note_line(&fields.with_start(start));
            }
        }
    }

    if is_break_line(line) {
        if let Some(position) = parse_break_position(line).and_then(|p| p.checked_add(offset)) {
            return build_break_line(position);
        }
    }

    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(lines: &[String]) -> Vec<i64> {
        lines
            .iter()
            .filter_map(|l| parse_note_line(l).and_then(|f| f.start_beat()))
            .collect()
    }

    #[test]
    fn test_cumulative_offsets_shift_notes() {
        let lines = [": 10 5 3 a", ": 20 5 3 b", ": 30 5 3 c", ": 40 5 3 d"];
        let offsets: OffsetMap = [(0, 5), (2, 10)].into_iter().collect();
        let result = apply_beat_offsets(&lines, &offsets);
        assert_eq!(starts(&result), vec![15, 25, 45, 55]);
        assert_eq!(result[0], ": 15 5 3 a");
    }

    #[test]
    fn test_zero_offsets_are_identity() {
        let lines = [": 010 5 3 a ", "- 0015", "E", "junk"];
        assert_eq!(apply_beat_offsets(&lines, &OffsetMap::new()), lines);

        let offsets: OffsetMap = [(1, 0)].into_iter().collect();
        assert_eq!(apply_beat_offsets(&lines, &offsets), lines);
    }

    #[test]
    fn test_offsets_that_cancel_out_preserve_lines() {
        let lines = [": 10 5 3 a", ": 020 5 3 b", ": 30 5 3 c"];
        let offsets: OffsetMap = [(0, 4), (1, -4)].into_iter().collect();
        let result = apply_beat_offsets(&lines, &offsets);
        assert_eq!(result, vec![": 14 5 3 a", ": 020 5 3 b", ": 30 5 3 c"]);
    }

    #[test]
    fn test_breaks_shift_with_notes() {
        let lines = [": 10 5 3 a", "- 16", "-", ": 20 5 3 b", "E"];
        let offsets: OffsetMap = [(1, -3)].into_iter().collect();
        let result = apply_beat_offsets(&lines, &offsets);
        assert_eq!(result, vec![": 10 5 3 a", "- 13", "-", ": 17 5 3 b", "E"]);
    }

    #[test]
    fn test_unparseable_lines_are_untouched() {
        let lines = [": broken", ": x 5 3 a", "- abc"];
        let offsets: OffsetMap = [(0, 7)].into_iter().collect();
        assert_eq!(apply_beat_offsets(&lines, &offsets), lines);
    }

    #[test]
    fn test_overflowing_shift_leaves_line_untouched() {
        let lines = [": 9223372036854775807 1 1 a", "- 9223372036854775807", ": 10 1 1 b"];
        let offsets: OffsetMap = [(0, 1)].into_iter().collect();
        let result = apply_beat_offsets(&lines, &offsets);
        assert_eq!(
            result,
            vec![": 9223372036854775807 1 1 a", "- 9223372036854775807", ": 11 1 1 b"]
        );
    }

    #[test]
    fn test_cumulative_offsets_saturate() {
        let offsets: OffsetMap = [(0, i64::MAX), (1, i64::MAX), (2, -1)].into_iter().collect();
        assert_eq!(
            cumulative_offsets(3, &offsets),
            vec![i64::MAX, i64::MAX, i64::MAX - 1]
        );
        let lines = [": 10 1 1 a", ": 20 1 1 b"];
        assert_eq!(apply_beat_offsets(&lines, &offsets), lines);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let lines = vec![": 10 5 3 a".to_string()];
        let offsets: OffsetMap = [(0, 1)].into_iter().collect();
        let result = apply_beat_offsets(&lines, &offsets);
        assert_eq!(lines[0], ": 10 5 3 a");
        assert_eq!(result[0], ": 11 5 3 a");
    }

    #[test]
    fn test_cumulative_offsets_vector() {
        let offsets: OffsetMap = [(1, 2), (3, -5)].into_iter().collect();
        assert_eq!(cumulative_offsets(5, &offsets), vec![0, 2, 2, -3, -3]);
        assert!(has_offsets(&offsets));
        let zeros: OffsetMap = [(1, 0)].into_iter().collect();
        assert!(!has_offsets(&zeros));
    }

    #[test]
    fn test_set_from_input() {
        let mut offsets = OffsetMap::new();
        offsets.set_from_input(2, "5");
        assert_eq!(offsets.get(2), Some(5));
        offsets.set_from_input(2, "-3");
        assert_eq!(offsets.get(2), Some(-3));
        offsets.set_from_input(2, "");
        assert_eq!(offsets.get(2), None);
        offsets.set_from_input(4, "abc");
        assert!(offsets.is_empty());
    }

    #[test]
    fn test_parse_offset_arg() {
        assert_eq!(parse_offset_arg("3=5").unwrap(), (3, 5));
        assert_eq!(parse_offset_arg("12=-4").unwrap(), (12, -4));
        assert_eq!(parse_offset_arg("0=+8").unwrap(), (0, 8));
        assert!(matches!(
            parse_offset_arg("3"),
            Err(StarsyncError::InvalidOffset(_))
        ));
        assert!(parse_offset_arg("-1=2").is_err());
        assert!(parse_offset_arg("1=two").is_err());
    }
}
