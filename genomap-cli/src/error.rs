//! Error handling for the genomap CLI

use genomap_core::MapError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for genomap CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Attach the input file name to a core error
    pub fn from_map_error(file: &str, err: MapError) -> Self {
        match err {
            MapError::UnsupportedFormat(_) => Self::invalid_format(err.to_string()),
            MapError::Parse { .. } | MapError::Fasta(_) | MapError::EmptyInput(_) => {
                Self::parse(file.to_string(), err.to_string())
            }
            MapError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::file_not_found(PathBuf::from(file))
            }
            MapError::Io(e) => Self::io(e.to_string()),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file\n\
                 • Gzipped FASTA is read directly, no need to decompress",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use --format circular or --format linear\n\
                 • Check the [map] format value in genomap.toml",
            );
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Plot files need two tab-separated columns: position and score\n\
                 • Positions are 1-based and must increase from line to line\n\
                 • Lines starting with # are ignored",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your genomap.toml configuration file\n\
                 • Use 'genomap config --example' to generate a sample configuration\n\
                 • Verify that all configuration values are valid",
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Pass --fasta or --length so the map has a sequence\n\
                 • Window and step sizes must be positive",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("test.fa"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_map_error_conversion() {
        let err = CliError::from_map_error("skew.tsv", MapError::parse(3, "invalid score 'x'"));
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().contains("skew.tsv"));

        let err = CliError::from_map_error("-", MapError::UnsupportedFormat("spiral".into()));
        assert!(format_error_with_suggestions(&err).contains("--format circular"));

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CliError::from_map_error("genome.fa", MapError::Io(missing));
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
