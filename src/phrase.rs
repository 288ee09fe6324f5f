//! Phrase grouping: runs of note lines delimited by break lines.

use crate::line::{is_break_line, is_note_line};

/// Consecutive note lines of one phrase, borrowed from the chart body. Blocks
/// are only counted and compared, never rewritten, so they hold no copies.
pub type NoteBlock<'a> = Vec<&'a str>;

/// Group the note lines of a chart into phrase blocks.
///
/// Breaks close the current block; consecutive breaks never produce an empty
/// block. Lines that are neither notes nor breaks are ignored.
pub fn group_note_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<NoteBlock<'_>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if is_note_line(line) {
            current.push(line);
        } else if is_break_line(line) && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Whether the line at `index` opens a phrase: a note that is the first line
/// of the chart, or whose nearest preceding note-or-break line is a break.
pub fn is_first_note_of_phrase<S: AsRef<str>>(lines: &[S], index: usize) -> bool {
    match lines.get(index) {
        Some(line) if is_note_line(line.as_ref()) => {}
        _ => return false,
    }
    if index == 0 {
        return true;
    }

    for line in lines[..index].iter().rev() {
        let line = line.as_ref();
        if is_break_line(line) {
            return true;
        }
        if is_note_line(line) {
            return false;
        }
    }
    false
}
