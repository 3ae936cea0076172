//! Error types for source scanning

use std::path::PathBuf;

/// Errors while reading or parsing a source file
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// IO error reading a source file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File extension with no grammar
    #[error("unsupported source file: {0}")]
    UnsupportedSource(PathBuf),

    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser returned no tree
    #[error("parse failed: {0}")]
    ParseFailed(PathBuf),
}

impl ScanError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
