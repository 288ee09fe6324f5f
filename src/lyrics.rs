//! # Lyric Tokenizer
//!
//! Moves lyrics between the chart and a plain-text transcript.
//!
//! In the transcript, each line is a phrase, spaces separate words and the
//! syllable separator (`|` by default) splits a word into the syllables that
//! map onto individual notes:
//!
//! ```text
//! Hel|lo world [chorus]
//! Good|bye
//! ```
//!
//! Bracketed annotations such as `[chorus]` are stripped before tokenizing.

use serde::Serialize;

use crate::line::{is_break_line, is_note_line, parse_note_line};

pub const DEFAULT_SEPARATOR: char = '|';

/// One syllable of a tokenized phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllable {
    pub text: String,
    pub is_last_in_word: bool,
    pub is_last_in_phrase: bool,
}

/// Tokenize a transcript with the default `|` separator.
pub fn extract_syllables(text: &str) -> Vec<Vec<Syllable>> {
    extract_syllables_with(text, DEFAULT_SEPARATOR)
}

/// Tokenize a transcript into phrases of syllables.
///
/// Lines that are blank once annotations are removed produce no phrase.
pub fn extract_syllables_with(text: &str, separator: char) -> Vec<Vec<Syllable>> {
    text.lines()
        .filter_map(|line| {
            let clean = strip_annotations(line);
            let phrase = tokenize_phrase(&clean, separator);
            (!phrase.is_empty()).then_some(phrase)
        })
        .collect()
}

fn tokenize_phrase(line: &str, separator: char) -> Vec<Syllable> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let mut syllables = Vec::new();

    for (word_index, word) in words.iter().enumerate() {
        let parts: Vec<&str> = word.split(separator).filter(|s| !s.is_empty()).collect();
        let last_word = word_index + 1 == words.len();
        for (i, part) in parts.iter().enumerate() {
            let last_in_word = i + 1 == parts.len();
            syllables.push(Syllable {
                text: (*part).to_string(),
                is_last_in_word: last_in_word,
                is_last_in_phrase: last_word && last_in_word,
            });
        }
    }

    syllables
}

/// Remove every `[...]` group, matching each `[` with the nearest `]`.
/// An unclosed `[` is left in place.
fn strip_annotations(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        match rest[open + 1..].find(']') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + 1 + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Rebuild the transcript of a chart with the default separator.
pub fn extract_original_lyrics(lines: &[String]) -> String {
    extract_original_lyrics_with(lines, DEFAULT_SEPARATOR)
}

/// Rebuild the transcript of a chart, one phrase per break-delimited block.
///
/// Unparseable note lines contribute an empty syllable.
pub fn extract_original_lyrics_with(lines: &[String], separator: char) -> String {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines {
        if is_note_line(line) {
            let text = parse_note_line(line).map(|fields| fields.text).unwrap_or_default();
            log::debug!("Parsed syllable: {text:?}");
            current.push(text);
        } else if is_break_line(line) && !current.is_empty() {
            phrases.push(build_phrase_from_syllables(&current, separator));
            current.clear();
        }
    }

    if !current.is_empty() {
        phrases.push(build_phrase_from_syllables(&current, separator));
    }

    phrases.join("\n")
}

/// Join chart syllables back into a transcript line.
///
/// A syllable ending in a space closes its word; otherwise the next syllable
/// belongs to the same word and is joined with the separator.
pub fn build_phrase_from_syllables<S: AsRef<str>>(syllables: &[S], separator: char) -> String {
    let mut phrase = String::new();

    for (i, syllable) in syllables.iter().enumerate() {
        let syllable = syllable.as_ref();
        if i > 0 {
            let prev = syllables[i - 1].as_ref();
            if !prev.is_empty() && !prev.ends_with(' ') {
                phrase.push(separator);
            }
        }
        phrase.push_str(syllable);
    }

    phrase.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(phrase: &[Syllable]) -> Vec<&str> {
        phrase.iter().map(|s| s.text.as_str()).collect()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_extract_syllables_words() {
        let phrases = extract_syllables("Hello world");
        assert_eq!(phrases.len(), 1);
        assert_eq!(texts(&phrases[0]), vec!["Hello", "world"]);
        assert!(phrases[0][0].is_last_in_word);
        assert!(!phrases[0][0].is_last_in_phrase);
        assert!(phrases[0][1].is_last_in_word);
        assert!(phrases[0][1].is_last_in_phrase);
    }

    #[test]
    fn test_extract_syllables_splits_on_separator() {
        let phrases = extract_syllables("Hel|lo wor|ld");
        assert_eq!(texts(&phrases[0]), vec!["Hel", "lo", "wor", "ld"]);
        let flags: Vec<(bool, bool)> = phrases[0]
            .iter()
            .map(|s| (s.is_last_in_word, s.is_last_in_phrase))
            .collect();
        assert_eq!(
            flags,
            vec![(false, false), (true, false), (false, false), (true, true)]
        );
    }

    #[test]
    fn test_extract_syllables_multiple_lines_and_blanks() {
        let phrases = extract_syllables("Line one\n\n   \nLine two\r\n");
        assert_eq!(phrases.len(), 2);
        assert_eq!(texts(&phrases[1]), vec!["Line", "two"]);
    }

    #[test]
    fn test_extract_syllables_strips_annotations() {
        let phrases = extract_syllables("[Verse 1]\nHel|lo [x2] there\n[Chorus]");
        assert_eq!(phrases.len(), 1);
        assert_eq!(texts(&phrases[0]), vec!["Hel", "lo", "there"]);
    }

    #[test]
    fn test_extract_syllables_drops_empty_tokens() {
        let phrases = extract_syllables("|a||b| c");
        assert_eq!(texts(&phrases[0]), vec!["a", "b", "c"]);
        assert!(phrases[0][1].is_last_in_word);
    }

    #[test]
    fn test_extract_syllables_custom_separator() {
        let phrases = extract_syllables_with("Hel-lo", '-');
        assert_eq!(texts(&phrases[0]), vec!["Hel", "lo"]);
    }

    #[test]
    fn test_strip_annotations_non_greedy() {
        assert_eq!(strip_annotations("a [b] c [d] e"), "a  c  e");
        assert_eq!(strip_annotations("a [unclosed"), "a [unclosed");
    }

    #[test]
    fn test_extract_original_lyrics() {
        let chart = lines(&[
            ": 10 5 3 Hel",
            ": 15 5 3 lo ",
            ": 20 5 3 world",
            "- 30",
            ": 40 5 3 Good",
            ": 45 5 3 bye",
            "E",
        ]);
        assert_eq!(extract_original_lyrics(&chart), "Hel|lo world\nGood|bye");
    }

    #[test]
    fn test_extract_original_lyrics_skips_empty_phrases() {
        let chart = lines(&["- 5", "- 6", ": 10 5 3 Solo", "-"]);
        assert_eq!(extract_original_lyrics(&chart), "Solo");
    }

    #[test]
    fn test_build_phrase_from_syllables() {
        assert_eq!(build_phrase_from_syllables(&["Hel", "lo ", "you "], '|'), "Hel|lo you");
        // an empty syllable joins the next one directly
        assert_eq!(build_phrase_from_syllables(&["a", "", "b"], '|'), "a|b");
        assert_eq!(build_phrase_from_syllables::<&str>(&[], '|'), "");
    }

    #[test]
    fn test_round_trip_through_transcript() {
        let chart = lines(&[": 1 1 1 Hel", ": 2 1 1 lo ", ": 3 1 1 there"]);
        let transcript = extract_original_lyrics(&chart);
        let phrases = extract_syllables(&transcript);
        assert_eq!(texts(&phrases[0]), vec!["Hel", "lo", "there"]);
    }
}
