use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the meter-chart core.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The input text contained no non-blank content at all.
    #[error("Input is empty")]
    EmptyInput,

    /// The input had fewer than the two non-empty lines needed for a header
    /// row plus at least one data row.
    #[error("Insufficient rows: found {found} non-empty line(s), need at least 2")]
    InsufficientRows { found: usize },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value or command-line argument is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the meter-chart crates.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_input() {
        let err = ChartError::EmptyInput;
        assert_eq!(err.to_string(), "Input is empty");
    }

    #[test]
    fn test_error_display_insufficient_rows() {
        let err = ChartError::InsufficientRows { found: 1 };
        let msg = err.to_string();
        assert!(msg.contains("found 1"));
        assert!(msg.contains("at least 2"));
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ChartError::FileRead {
            path: PathBuf::from("/some/export.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/export.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_config() {
        let err = ChartError::Config("unknown column \"V9\"".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown column \"V9\"");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChartError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
