//! Wall-clock start of each phrase, for display next to the chart body.

use serde::Serialize;

use crate::line::parse_note_line;
use crate::phrase::is_first_note_of_phrase;
use crate::retime::{cumulative_offsets, OffsetMap};
use crate::time::{beat_to_time, BeatTime};

/// Timing of the note that opens a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseTiming {
    pub line_index: usize,
    /// Start beat with the running offset applied.
    pub beat: i64,
    pub offset: i64,
    /// `None` when the BPM is unusable.
    pub time: Option<BeatTime>,
}

impl PhraseTiming {
    /// `MM:SS`, or an empty string when timing is unknown.
    pub fn label(&self) -> String {
        self.time.map(BeatTime::label).unwrap_or_default()
    }
}

pub fn phrase_timeline<S: AsRef<str>>(
    lines: &[S],
    bpm: Option<f64>,
    gap_ms: f64,
    offsets: &OffsetMap,
) -> Vec<PhraseTiming> {
    let cumulative = cumulative_offsets(lines.len(), offsets);
    let mut timeline = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line: &str = line.as_ref();
        if !is_first_note_of_phrase(lines, index) {
            continue;
        }
        let Some(start) = parse_note_line(line).and_then(|fields| fields.start_beat()) else {
            continue;
        };
        let beat = start.saturating_add(cumulative[index]);
        timeline.push(PhraseTiming {
            line_index: index,
            beat,
            offset: cumulative[index],
            time: beat_to_time(beat as f64, bpm, gap_ms),
        });
    }

    timeline
}
