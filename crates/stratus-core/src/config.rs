//! Synthesis configuration
//!
//! Defaults mirror the conventions of a single-package serverless project:
//! `template.yaml` at the root, sources under `src/`, handler stubs under
//! `handlers/`.
//!
//! # Example
//!
//! ```rust
//! use stratus_core::SynthesisConfig;
//!
//! let config = SynthesisConfig::new()
//!     .with_project_root("/work/shop")
//!     .with_default_runtime("nodejs18.x");
//! assert_eq!(config.template_path(), std::path::Path::new("/work/shop/template.yaml"));
//! ```

use crate::error::SynthesisError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stratus_annotations::{DEFAULT_HANDLERS_DIR, DEFAULT_RUNTIME};
use stratus_template::DEFAULT_BACKUP_SUFFIX;

/// Template file name used when no template path is configured
pub const DEFAULT_TEMPLATE_NAME: &str = "template.yaml";

/// Source glob used when none is configured
pub const DEFAULT_SOURCE_GLOB: &str = "src/**/*.ts";

/// Package a project must depend on to be scanned
pub const DEFAULT_MARKER_PACKAGE: &str = "stratus";

/// Synthesis run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Directory searched for opted-in projects
    pub project_root: PathBuf,
    /// Template path; `<project_root>/template.yaml` when unset
    pub template_path: Option<PathBuf>,
    /// Source glob, relative to each project directory
    pub source_glob: String,
    /// Dependency name that opts a project in
    pub marker_package: String,
    /// Suffix of the template backup
    pub backup_suffix: String,
    /// Handler stub directory, relative to each project
    pub handlers_dir: String,
    /// Runtime for functions that declare none
    pub default_runtime: String,
    /// Write handler stubs
    pub emit_handlers: bool,
}

impl SynthesisConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from a TOML file
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// [`SynthesisError::Io`] if the file cannot be read,
    /// [`SynthesisError::Config`] if it is not valid configuration.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SynthesisError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SynthesisError::io_error(path, e))?;
        Self::from_toml_str(&text)
            .map_err(|e| SynthesisError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// [`SynthesisError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SynthesisError> {
        toml::from_str(text).map_err(|e| SynthesisError::Config(e.to_string()))
    }

    /// With project root
    #[inline]
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// With explicit template path
    #[inline]
    #[must_use]
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// With source glob
    #[inline]
    #[must_use]
    pub fn with_source_glob(mut self, glob: impl Into<String>) -> Self {
        self.source_glob = glob.into();
        self
    }

    /// With marker package
    #[inline]
    #[must_use]
    pub fn with_marker_package(mut self, package: impl Into<String>) -> Self {
        self.marker_package = package.into();
        self
    }

    /// With backup suffix
    #[inline]
    #[must_use]
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// With handler directory
    #[inline]
    #[must_use]
    pub fn with_handlers_dir(mut self, dir: impl Into<String>) -> Self {
        self.handlers_dir = dir.into();
        self
    }

    /// With default runtime
    #[inline]
    #[must_use]
    pub fn with_default_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.default_runtime = runtime.into();
        self
    }

    /// With handler emission on or off
    #[inline]
    #[must_use]
    pub fn with_emit_handlers(mut self, emit: bool) -> Self {
        self.emit_handlers = emit;
        self
    }

    /// Effective template path
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.template_path
            .clone()
            .unwrap_or_else(|| self.project_root.join(DEFAULT_TEMPLATE_NAME))
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// [`SynthesisError::Config`] naming the first empty setting.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        let required = [
            ("source_glob", &self.source_glob),
            ("marker_package", &self.marker_package),
            ("backup_suffix", &self.backup_suffix),
            ("handlers_dir", &self.handlers_dir),
            ("default_runtime", &self.default_runtime),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(SynthesisError::Config(format!("{key} must not be empty"))),
            None => Ok(()),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            template_path: None,
            source_glob: DEFAULT_SOURCE_GLOB.to_string(),
            marker_package: DEFAULT_MARKER_PACKAGE.to_string(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            handlers_dir: DEFAULT_HANDLERS_DIR.to_string(),
            default_runtime: DEFAULT_RUNTIME.to_string(),
            emit_handlers: true,
        }
    }
}
