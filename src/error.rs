//! # Error Types
//!
//! Errors raised at the edges of the crate: loading charts and configuration,
//! parsing command-line offsets, writing output.
//!
//! The chart model itself never fails on malformed content. Unparseable lines
//! are skipped or passed through, and count mismatches surface as warnings
//! from the [`Synchronizer`](crate::Synchronizer).
//!
//! ## Usage
//! ```rust
//! use starsync::{load_chart, StarsyncError};
//!
//! match load_chart("#TITLE:Only a header") {
//!     Ok(chart) => println!("{} lines", chart.note_lines.len()),
//!     Err(StarsyncError::EmptyChart) => eprintln!("nothing to edit"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarsyncError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration file is unreadable or invalid.
    ///
    /// # Example
    /// ```
    /// # use starsync::StarsyncError;
    /// let err = StarsyncError::Config("unknown field `colour`".to_string());
    /// assert_eq!(err.to_string(), "Configuration error: unknown field `colour`");
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chart has no body lines after the header.
    #[error("No valid note lines found in file")]
    EmptyChart,

    /// The chart path does not look like an UltraStar text file.
    #[error("Unsupported file {0}: expected a .txt chart")]
    UnsupportedFile(String),

    /// An offset argument is not of the form `INDEX=DELTA`.
    ///
    /// # Example
    /// ```
    /// # use starsync::StarsyncError;
    /// let err = StarsyncError::InvalidOffset("3".to_string());
    /// assert_eq!(err.to_string(), "Invalid offset '3': expected INDEX=DELTA");
    /// ```
    #[error("Invalid offset '{0}': expected INDEX=DELTA")]
    InvalidOffset(String),
}

impl From<io::Error> for StarsyncError {
    fn from(error: io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
