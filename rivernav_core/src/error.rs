//! Error type shared by every rivernav crate

use std::path::PathBuf;
use thiserror::Error;

/// rivernav errors
#[derive(Debug, Error)]
pub enum NavError {
    /// The depth source could not be opened. Fatal to initialization.
    #[error("Depth source '{path}' is unavailable: {reason}")]
    DataSourceUnavailable { path: PathBuf, reason: String },

    /// Interpolation was requested on a grid without a single known sample.
    #[error("Cannot approximate a {width}x{height} grid without known samples")]
    InsufficientSamples { width: usize, height: usize },

    /// The planner could not connect the entry edge to the exit edge.
    /// Advisory only: navigation continues on live sensing.
    #[error("No route to exit row {exit_row}; best partial route stops at row {reached_row}")]
    InfeasibleRoute { reached_row: i32, exit_row: i32 },

    /// No further segments are available.
    #[error("Course exhausted: no further segments")]
    CourseExhausted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Image error: {0}")]
    Image(String),

    /// A segment failed to prepare mid-course. Terminal until reset.
    #[error("Course halted after a failed segment: {0}")]
    Halted(String),

    /// The background segment worker failed or disappeared.
    #[error("Prefetch error: {0}")]
    Prefetch(String),
}

impl NavError {
    /// Create a data source error for `path`
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        NavError::DataSourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for rivernav operations
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_path() {
        let err = NavError::unavailable("river.txt", "No such file");
        let text = err.to_string();
        assert!(text.contains("river.txt"));
        assert!(text.contains("No such file"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: NavError = io.into();
        assert!(matches!(err, NavError::Io(_)));
    }
}
