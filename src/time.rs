//! # Time Model
//!
//! Conversions between millisecond durations, `MM:SS.mmm` components and
//! chart beats.
//!
//! One chart beat is a quarter of a BPM beat, so a beat lands at
//! `beat * 60 / bpm / 4` seconds after the GAP.
//!
//! The converters are plain arithmetic: out-of-range components are not
//! rejected here (see [`validate_components`]) and negative inputs produce
//! whatever the formulas produce.

use serde::Serialize;

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_SECOND: i64 = 1_000;
pub const MAX_SECONDS: i64 = 59;
pub const MAX_MILLISECONDS: i64 = 999;

/// A duration split into minutes, seconds and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeComponents {
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl TimeComponents {
    pub const fn new(minutes: i64, seconds: i64, milliseconds: i64) -> Self {
        Self {
            minutes,
            seconds,
            milliseconds,
        }
    }

    pub fn to_ms(self) -> i64 {
        components_to_ms(self.minutes, self.seconds, self.milliseconds)
    }

    pub fn is_valid(self) -> bool {
        validate_components(self.minutes, self.seconds, self.milliseconds)
    }
}

/// Wall-clock position of a beat, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeatTime {
    pub minutes: i64,
    pub seconds: i64,
}

impl BeatTime {
    pub fn label(self) -> String {
        format_time(self.minutes, self.seconds)
    }
}

pub fn ms_to_components(total_ms: i64) -> TimeComponents {
    // floored minutes, truncated remainders
    let minutes = total_ms.div_euclid(MS_PER_MINUTE);
    let seconds = (total_ms % MS_PER_MINUTE).div_euclid(MS_PER_SECOND);
    let milliseconds = total_ms % MS_PER_SECOND;
    TimeComponents::new(minutes, seconds, milliseconds)
}

pub fn components_to_ms(minutes: i64, seconds: i64, milliseconds: i64) -> i64 {
    minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + milliseconds
}

pub fn validate_components(minutes: i64, seconds: i64, milliseconds: i64) -> bool {
    minutes >= 0
        && (0..=MAX_SECONDS).contains(&seconds)
        && (0..=MAX_MILLISECONDS).contains(&milliseconds)
}

/// Convert a chart beat into wall-clock time.
///
/// Returns `None` when the BPM is missing, zero, negative or not a number;
/// callers display that as "timing unknown".
pub fn beat_to_time(beat: f64, bpm: Option<f64>, gap_ms: f64) -> Option<BeatTime> {
    let bpm = bpm.filter(|bpm| *bpm > 0.0)?;
    let time_seconds = beat * 60.0 / bpm / 4.0 + gap_ms / 1000.0;
    Some(BeatTime {
        minutes: (time_seconds / 60.0).floor() as i64,
        seconds: (time_seconds % 60.0).floor() as i64,
    })
}

/// Render `MM:SS`; fields wider than two digits are not truncated.
pub fn format_time(minutes: i64, seconds: i64) -> String {
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_components() {
        assert_eq!(ms_to_components(0), TimeComponents::new(0, 0, 0));
        assert_eq!(ms_to_components(999), TimeComponents::new(0, 0, 999));
        assert_eq!(ms_to_components(1000), TimeComponents::new(0, 1, 0));
        assert_eq!(ms_to_components(59_999), TimeComponents::new(0, 59, 999));
        assert_eq!(ms_to_components(60_000), TimeComponents::new(1, 0, 0));
        assert_eq!(ms_to_components(97_048), TimeComponents::new(1, 37, 48));
        assert_eq!(ms_to_components(3_661_500), TimeComponents::new(61, 1, 500));
    }

    #[test]
    fn test_components_to_ms() {
        assert_eq!(components_to_ms(0, 0, 0), 0);
        assert_eq!(components_to_ms(1, 37, 48), 97_048);
        assert_eq!(components_to_ms(61, 1, 500), 3_661_500);
        assert_eq!(components_to_ms(0, 30, 0), 30_000);
        // out-of-range components are still plain arithmetic
        assert_eq!(components_to_ms(0, 90, 1500), 91_500);
    }

    #[test]
    fn test_time_round_trip() {
        for ms in [0, 1, 999, 1234, 15_750, 56_789, 97_048, 123_456, 999_999, 3_661_500] {
            assert_eq!(ms_to_components(ms).to_ms(), ms, "round trip failed for {ms}");
        }
    }

    #[test]
    fn test_validate_components() {
        assert!(validate_components(0, 0, 0));
        assert!(validate_components(1, 30, 500));
        assert!(validate_components(100, 59, 999));
        assert!(!validate_components(-1, 0, 0));
        assert!(!validate_components(0, -1, 0));
        assert!(!validate_components(0, 0, -1));
        assert!(!validate_components(0, 60, 0));
        assert!(!validate_components(0, 0, 1000));
        assert!(TimeComponents::new(1, 37, 48).is_valid());
    }

    #[test]
    fn test_beat_to_time() {
        assert_eq!(
            beat_to_time(480.0, Some(120.0), 0.0),
            Some(BeatTime { minutes: 1, seconds: 0 })
        );
        assert_eq!(
            beat_to_time(240.0, Some(120.0), 5000.0),
            Some(BeatTime { minutes: 0, seconds: 35 })
        );
        assert_eq!(
            beat_to_time(240.0, Some(60.0), 0.0),
            Some(BeatTime { minutes: 1, seconds: 0 })
        );
        // 7.5 seconds floors to 7
        assert_eq!(
            beat_to_time(60.0, Some(120.0), 0.0),
            Some(BeatTime { minutes: 0, seconds: 7 })
        );
    }

    #[test]
    fn test_beat_to_time_rejects_bad_bpm() {
        assert_eq!(beat_to_time(100.0, Some(0.0), 0.0), None);
        assert_eq!(beat_to_time(100.0, Some(-120.0), 0.0), None);
        assert_eq!(beat_to_time(100.0, None, 0.0), None);
        assert_eq!(beat_to_time(100.0, Some(f64::NAN), 0.0), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0, 0), "00:00");
        assert_eq!(format_time(1, 30), "01:30");
        assert_eq!(format_time(5, 9), "05:09");
        assert_eq!(format_time(99, 99), "99:99");
        assert_eq!(format_time(123, 4), "123:04");
        assert_eq!(BeatTime { minutes: 2, seconds: 3 }.label(), "02:03");
    }
}
