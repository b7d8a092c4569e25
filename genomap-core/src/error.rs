//! Error types for the genome map core

use thiserror::Error;

/// Result type for map operations
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised outside the geometry hot paths.
///
/// Coordinate transforms never return these: malformed numeric input there
/// propagates as NaN coordinates instead.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Unsupported layout format '{0}': expected 'circular' or 'linear'")]
    UnsupportedFormat(String),

    #[error("Invalid sequence length: {0} (must be at least 1 bp)")]
    InvalidSequenceLength(u64),

    #[error("Plot series length mismatch: {positions} positions vs {scores} scores")]
    SeriesLengthMismatch { positions: usize, scores: usize },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = MapError::UnsupportedFormat("spiral".into());
        assert_eq!(
            err.to_string(),
            "Unsupported layout format 'spiral': expected 'circular' or 'linear'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MapError = io_err.into();
        assert!(matches!(err, MapError::Io(_)));
    }
}
