//! # starsync
//!
//! Edit and re-time UltraStar karaoke charts.
//!
//! ## Pipeline
//! 1. [`parse_file`] splits a `.txt` chart into header fields and body lines
//! 2. [`Synchronizer`] aligns a new lyric transcript onto the existing notes,
//!    or [`apply_beat_offsets`] shifts notes and breaks by beat deltas
//! 3. [`generate_file`] writes the chart back, header order preserved
//!
//! Every function is pure and works on in-memory lines; file access lives in
//! the binary.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod line;
pub mod lyrics;
pub mod phrase;
pub mod retime;
pub mod sync;
pub mod time;
pub mod timeline;

pub use api::*;
pub use chart::*;
pub use config::SyncConfig;
pub use error::*;
pub use line::*;
pub use lyrics::*;
pub use phrase::*;
pub use retime::*;
pub use sync::*;
pub use time::*;
pub use timeline::*;
