//! Error types for FormatKit
//!
//! The range index itself is total: merge, edit propagation and extraction
//! never fail on well-formed input. Errors only surface at the edges of the
//! crate, where input arrives as JSON or from a caller-driven slot edit.

use thiserror::Error;

/// Errors surfaced by the registry, JSON interchange and slot operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// A JSON view referenced a formatter name the registry does not know
    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    /// Position is out of bounds
    #[error("Position {position} out of bounds (length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// Range is reversed or out of bounds
    #[error("Invalid range {start}..{end} (length: {length})")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },

    /// JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FormatError::PositionOutOfBounds {
            position: 12,
            length: 10,
        };
        assert_eq!(err.to_string(), "Position 12 out of bounds (length: 10)");

        let err = FormatError::InvalidRange {
            start: 5,
            end: 2,
            length: 10,
        };
        assert_eq!(err.to_string(), "Invalid range 5..2 (length: 10)");

        let err = FormatError::UnknownFormatter("bold".to_string());
        assert_eq!(err.to_string(), "Unknown formatter: bold");
    }

    #[test]
    fn test_json_error_converts() {
        fn parse(input: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(input)?)
        }

        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, FormatError::Json(_)));
    }
}
