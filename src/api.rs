//! # Public API
//!
//! High-level pipelines that combine the chart model with the synchronizer
//! and the retimer.
//!
//! - [`load_chart()`] - Parse file content, rejecting charts without a body
//! - [`check_chart_path()`] - Reject paths that are not `.txt` charts
//! - [`synchronize_chart()`] - Align a new transcript onto a chart's notes
//! - [`render_synced()`] - Regenerate a file from synchronized lines
//! - [`retime_chart()`] - Apply beat offsets and regenerate the file
//!
//! ## Typical Usage
//!
//! ```rust
//! use starsync::{load_chart, parse_metadata, render_synced, synchronize_chart, SyncConfig};
//!
//! let chart = load_chart("#TITLE:Song\n#GAP:500\n: 0 4 5 old\n: 4 4 5 words\nE")?;
//! let report = synchronize_chart(&chart, "new lyr|ics", &SyncConfig::default());
//! assert_eq!(report.warnings.len(), 1);
//!
//! let metadata = parse_metadata(&chart.header);
//! let text = render_synced(&chart, &metadata, &report);
//! assert_eq!(text, "#TITLE:Song\n#GAP:500\n\n: 0 4 5 new \n: 4 4 5 lyr\nE");
//! # Ok::<(), starsync::StarsyncError>(())
//! ```

use std::path::Path;

use crate::{
    apply_beat_offsets, generate_file, parse_file, parse_metadata, Chart, Metadata, OffsetMap,
    StarsyncError, SyncConfig, SyncedLine, Synchronizer, FILE_EXTENSION,
};

/// Result of aligning a transcript onto a chart.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub lines: Vec<SyncedLine>,
    pub warnings: Vec<String>,
}

/// Parse chart content for editing.
///
/// # Errors
/// Returns [`StarsyncError::EmptyChart`] when the file has no body lines.
pub fn load_chart(content: &str) -> Result<Chart, StarsyncError> {
    let chart = parse_file(content);
    if chart.note_lines.is_empty() {
        return Err(StarsyncError::EmptyChart);
    }
    log::info!("File loaded: {} lines", chart.note_lines.len());
    Ok(chart)
}

/// Accept only paths ending in `.txt`.
pub fn check_chart_path(path: &Path) -> Result<(), StarsyncError> {
    let name = path.to_string_lossy();
    if name.ends_with(FILE_EXTENSION) {
        Ok(())
    } else {
        Err(StarsyncError::UnsupportedFile(name.into_owned()))
    }
}

/// Validate and synchronize in one go. Warnings are also logged.
pub fn synchronize_chart(chart: &Chart, lyrics: &str, config: &SyncConfig) -> SyncReport {
    let mut synchronizer =
        Synchronizer::with_separator(&chart.note_lines, lyrics, config.syllable_separator);
    let warnings = synchronizer.validate().to_vec();
    for warning in &warnings {
        log::warn!("{warning}");
    }

    let lines = synchronizer.synchronize();
    if warnings.is_empty() {
        log::info!("Synchronization completed successfully");
    } else {
        log::info!("Synchronization completed with {} warnings", warnings.len());
    }
    SyncReport { lines, warnings }
}

/// Regenerate the chart file from synchronized lines and edited metadata.
pub fn render_synced(chart: &Chart, metadata: &Metadata, report: &SyncReport) -> String {
    generate_file(&chart.header, metadata, &report.lines)
}

/// Apply beat offsets and regenerate the file, keeping the header's own
/// title, language and GAP.
///
/// The GAP is never edited here, so its stored text is written back as is,
/// fractional milliseconds included.
pub fn retime_chart(chart: &Chart, offsets: &OffsetMap) -> String {
    let lines = apply_beat_offsets(&chart.note_lines, offsets);
    let metadata = Metadata {
        gap: None,
        ..parse_metadata(&chart.header)
    };
    generate_file(&chart.header, &metadata, &lines)
}
