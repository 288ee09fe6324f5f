//! # Lyric Synchronizer
//!
//! Maps the syllables of a new transcript onto the notes of an existing
//! chart, keeping every note's kind, start, duration and pitch.
//!
//! ## Algorithm
//! A single left-to-right pass over the original lines with two cursors:
//! the phrase index (advanced by a break that closes a non-empty block) and
//! the syllable index within that phrase (advanced by every note).
//!
//! - Notes beyond the syllables of their phrase are blanked.
//! - Syllables beyond the notes of their block are never consumed.
//!
//! Both situations are reported by [`Synchronizer::validate`] as warnings,
//! never as errors.
//!
//! ## Example
//! ```rust
//! use starsync::Synchronizer;
//!
//! let lines = vec![": 10 5 3 Hello".to_string(), ": 15 5 3 World".to_string()];
//! let mut sync = Synchronizer::new(&lines, "Bon Test");
//! assert!(sync.validate().is_empty());
//!
//! let synced = sync.synchronize();
//! assert_eq!(synced[0].line(), ": 10 5 3 Bon ");
//! assert_eq!(synced[1].line(), ": 15 5 3 Test");
//! ```

use serde::{Serialize, Serializer};

use crate::line::{build_note_line, is_break_line, is_end_line, is_note_line, parse_note_line};
use crate::lyrics::{extract_syllables_with, Syllable, DEFAULT_SEPARATOR};
use crate::phrase::{group_note_blocks, NoteBlock};

/// One line of synchronizer output.
///
/// Serializes as a flat `{kind, line, original}` record for every kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncedLine {
    Break { line: String },
    End { line: String },
    /// `original` is the syllable the note carried before synchronization.
    Note { line: String, original: String },
    Other { line: String },
}

impl SyncedLine {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncedLine::Break { .. } => "break",
            SyncedLine::End { .. } => "end",
            SyncedLine::Note { .. } => "note",
            SyncedLine::Other { .. } => "other",
        }
    }

    pub fn line(&self) -> &str {
        match self {
            SyncedLine::Break { line }
            | SyncedLine::End { line }
            | SyncedLine::Note { line, .. }
            | SyncedLine::Other { line } => line,
        }
    }

    /// Pre-sync note text; empty for every other kind.
    pub fn original(&self) -> &str {
        match self {
            SyncedLine::Note { original, .. } => original,
            _ => "",
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, SyncedLine::Note { .. })
    }
}

#[derive(Serialize)]
struct SyncedRecord<'a> {
    kind: &'static str,
    line: &'a str,
    original: &'a str,
}

impl Serialize for SyncedLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SyncedRecord {
            kind: self.kind(),
            line: self.line(),
            original: self.original(),
        }
        .serialize(serializer)
    }
}

impl AsRef<str> for SyncedLine {
    fn as_ref(&self) -> &str {
        self.line()
    }
}

/// Aligns a tokenized transcript onto the note blocks of a chart.
pub struct Synchronizer<'a> {
    original_lines: &'a [String],
    phrases: Vec<Vec<Syllable>>,
    note_blocks: Vec<NoteBlock<'a>>,
    warnings: Vec<String>,
}

impl<'a> Synchronizer<'a> {
    pub fn new(original_lines: &'a [String], lyrics: &str) -> Self {
        Self::with_separator(original_lines, lyrics, DEFAULT_SEPARATOR)
    }

    pub fn with_separator(original_lines: &'a [String], lyrics: &str, separator: char) -> Self {
        Self {
            original_lines,
            phrases: extract_syllables_with(lyrics, separator),
            note_blocks: group_note_blocks(original_lines),
            warnings: Vec::new(),
        }
    }

    pub fn phrases(&self) -> &[Vec<Syllable>] {
        &self.phrases
    }

    pub fn note_blocks(&self) -> &[NoteBlock<'a>] {
        &self.note_blocks
    }

    /// Compare block/phrase and note/syllable counts.
    ///
    /// Warnings accumulate across calls and stay available via
    /// [`Synchronizer::warnings`].
    pub fn validate(&mut self) -> &[String] {
        log::debug!(
            "Note blocks: {}, lyric phrases: {}",
            self.note_blocks.len(),
            self.phrases.len()
        );

        if self.note_blocks.len() != self.phrases.len() {
            self.warnings.push(format!(
                "Warning: {} note blocks but {} lyric lines. Synchronization may be imperfect.",
                self.note_blocks.len(),
                self.phrases.len()
            ));
        }

        let total_notes: usize = self.note_blocks.iter().map(Vec::len).sum();
        let total_syllables: usize = self.phrases.iter().map(Vec::len).sum();
        if total_notes != total_syllables {
            self.warnings.push(format!(
                "Warning: {total_notes} notes but {total_syllables} syllables. Some notes may be empty or unused."
            ));
        }

        &self.warnings
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Rewrite every note line with its aligned syllable.
    ///
    /// Unparseable note lines are dropped from the output.
    pub fn synchronize(&self) -> Vec<SyncedLine> {
        let mut synced = Vec::with_capacity(self.original_lines.len());
        let mut block_index = 0;
        let mut syllable_index = 0;

        for line in self.original_lines {
            if is_break_line(line) {
                synced.push(SyncedLine::Break { line: line.clone() });
                if syllable_index > 0 {
                    block_index += 1;
                    syllable_index = 0;
                }
            } else if is_note_line(line) {
                let Some(fields) = parse_note_line(line) else {
                    log::debug!("Skipping unparseable note line {line:?}");
                    continue;
                };
                let text = self.syllable_text(block_index, syllable_index);
                syllable_index += 1;

                synced.push(SyncedLine::Note {
                    line: build_note_line(&fields.with_text(text)),
                    original: fields.text,
                });
            } else if is_end_line(line) {
                synced.push(SyncedLine::End { line: line.clone() });
            } else {
                synced.push(SyncedLine::Other { line: line.clone() });
            }
        }

        synced
    }

    /// Text for the note at the given cursors; a word boundary inside the
    /// phrase gets a trailing space.
    fn syllable_text(&self, block_index: usize, syllable_index: usize) -> String {
        let Some(syllable) = self
            .phrases
            .get(block_index)
            .and_then(|phrase| phrase.get(syllable_index))
        else {
            return String::new();
        };

        if syllable.is_last_in_word && !syllable.is_last_in_phrase {
            format!("{} ", syllable.text)
        } else {
            syllable.text.clone()
        }
    }
}
