//! Error types for synthesis runs
//!
//! Two tiers:
//! - [`SynthesisError`]: fatal, stops the run before anything is written
//! - [`ProjectSkip`]: a project that cannot be scanned; reported and skipped

use std::path::PathBuf;
use stratus_annotations::AnnotationError;
use stratus_scan::ScanError;
use stratus_template::TemplateError;

/// Fatal synthesis error
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Template load, merge or save failed
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Source file could not be read or parsed
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// A capability declaration is malformed
    #[error("{}:{line}: {declaration}: {source}", file.display())]
    Annotation {
        /// Source file
        file: PathBuf,
        /// 1-based line of the capability
        line: usize,
        /// Class carrying the capability
        declaration: String,
        /// Validation failure
        #[source]
        source: AnnotationError,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Source glob does not compile
    #[error("invalid source glob '{pattern}': {message}")]
    InvalidGlob {
        /// Pattern as configured
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// IO error outside the template
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl SynthesisError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error comes from a malformed declaration in user code
    #[inline]
    #[must_use]
    pub fn is_annotation_error(&self) -> bool {
        matches!(self, Self::Annotation { .. })
    }
}

/// Reason an opted-in project was not scanned
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectSkip {
    /// `package.json` is unreadable or not valid JSON
    #[error("unreadable manifest {path}: {message}")]
    UnreadableManifest {
        /// Manifest path
        path: PathBuf,
        /// Read or parse failure
        message: String,
    },

    /// Project has no `tsconfig.json`
    #[error("{project}: no tsconfig.json")]
    MissingTsConfig {
        /// Project directory
        project: PathBuf,
    },

    /// Source glob matched nothing
    #[error("{project}: no sources match '{glob}'")]
    NoSources {
        /// Project directory
        project: PathBuf,
        /// Source glob
        glob: String,
    },
}

impl ProjectSkip {
    /// Directory or manifest the skip refers to
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::UnreadableManifest { path, .. } => path,
            Self::MissingTsConfig { project } | Self::NoSources { project, .. } => project,
        }
    }
}
