//! Project discovery
//!
//! A project is a directory with a `package.json` that depends on the marker
//! package. Opted-in projects also need a `tsconfig.json`; its
//! `compilerOptions.rootDir`/`outDir` locate the compiled output that
//! handler stubs import.

use crate::error::{ProjectSkip, SynthesisError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use stratus_scan::is_declaration_file;
use walkdir::{DirEntry, WalkDir};

/// Manifest file name
pub const MANIFEST_NAME: &str = "package.json";

/// Compiler configuration file name
pub const TSCONFIG_NAME: &str = "tsconfig.json";

/// `rootDir` when the compiler configuration sets none
pub const DEFAULT_ROOT_DIR: &str = "src";

/// `outDir` when the compiler configuration sets none
pub const DEFAULT_OUT_DIR: &str = "dist";

const SKIP_DIRS: &[&str] = &["node_modules"];

/// The subset of `package.json` used for opt-in
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// True if `package` appears in either dependency table
    #[must_use]
    pub fn depends_on(&self, package: &str) -> bool {
        self.dependencies.contains_key(package) || self.dev_dependencies.contains_key(package)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigFile {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    root_dir: Option<String>,
    out_dir: Option<String>,
}

/// Compiler layout of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsConfig {
    /// Source root, relative to the project
    pub root_dir: PathBuf,
    /// Output directory, relative to the project
    pub out_dir: PathBuf,
}

impl Default for TsConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl TsConfig {
    /// Read `tsconfig.json`
    ///
    /// A file that is not plain JSON (comments, trailing commas) falls back to
    /// the default layout with a warning.
    ///
    /// # Errors
    /// [`SynthesisError::Io`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, SynthesisError> {
        let text = fs::read_to_string(path).map_err(|e| SynthesisError::io_error(path, e))?;
        Ok(Self::parse(&text).unwrap_or_else(|e| {
            tracing::warn!(
                "Could not parse {} ({}); assuming rootDir '{}' and outDir '{}'",
                path.display(),
                e,
                DEFAULT_ROOT_DIR,
                DEFAULT_OUT_DIR
            );
            Self::default()
        }))
    }

    /// Parse `tsconfig.json` text
    ///
    /// # Errors
    /// Returns the JSON error for text that is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let file: TsConfigFile = serde_json::from_str(text)?;
        let options = file.compiler_options;
        Ok(Self {
            root_dir: strip_dot(options.root_dir.as_deref().unwrap_or(DEFAULT_ROOT_DIR)),
            out_dir: strip_dot(options.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR)),
        })
    }
}

/// `./src/` → `src`
fn strip_dot(dir: &str) -> PathBuf {
    let trimmed = dir.trim_start_matches("./").trim_end_matches('/');
    PathBuf::from(if trimmed.is_empty() { "." } else { trimmed })
}

/// An opted-in project ready to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project directory
    pub root: PathBuf,
    /// Package name from the manifest
    pub name: Option<String>,
    /// Compiler layout
    pub tsconfig: TsConfig,
}

impl Project {
    /// Display name: the package name, else the directory name
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned())
        })
    }

    /// Source files matching `matcher`, relative to the project, sorted
    ///
    /// Declaration files (`*.d.ts`) are excluded.
    #[must_use]
    pub fn sources(&self, matcher: &globset::GlobMatcher) -> Vec<PathBuf> {
        let mut sources: Vec<PathBuf> = walk(&self.root)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?.to_path_buf();
                (matcher.is_match(&relative) && !is_declaration_file(&relative))
                    .then(|| self.root.join(relative))
            })
            .collect();
        sources.sort();
        sources
    }
}

/// Outcome of inspecting one opted-in manifest
pub type Discovered = Result<Project, ProjectSkip>;

/// Finds opted-in projects below a root directory
#[derive(Debug, Clone)]
pub struct ProjectDiscovery {
    root: PathBuf,
    marker_package: String,
}

impl ProjectDiscovery {
    /// Create discovery for `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, marker_package: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            marker_package: marker_package.into(),
        }
    }

    /// Inspect every manifest below the root, sorted by path
    ///
    /// Projects not depending on the marker package are left out entirely;
    /// opted-in projects that cannot be scanned are returned as skips.
    ///
    /// # Errors
    /// [`SynthesisError::Io`] if a `tsconfig.json` exists but cannot be read.
    pub fn discover(&self) -> Result<Vec<Discovered>, SynthesisError> {
        let mut manifests: Vec<PathBuf> = walk(&self.root)
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_NAME)
            .map(DirEntry::into_path)
            .collect();
        manifests.sort();

        let mut discovered = Vec::new();
        for manifest_path in manifests {
            if let Some(outcome) = self.inspect(&manifest_path)? {
                discovered.push(outcome);
            }
        }
        Ok(discovered)
    }

    fn inspect(&self, manifest_path: &Path) -> Result<Option<Discovered>, SynthesisError> {
        let root = manifest_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let manifest = match read_manifest(manifest_path) {
            Ok(manifest) => manifest,
            Err(message) => {
                return Ok(Some(Err(ProjectSkip::UnreadableManifest {
                    path: manifest_path.to_path_buf(),
                    message,
                })))
            }
        };

        if !manifest.depends_on(&self.marker_package) {
            tracing::debug!(
                "{} does not depend on {}; not a project",
                manifest_path.display(),
                self.marker_package
            );
            return Ok(None);
        }

        let tsconfig_path = root.join(TSCONFIG_NAME);
        if !tsconfig_path.is_file() {
            return Ok(Some(Err(ProjectSkip::MissingTsConfig { project: root })));
        }
        let tsconfig = TsConfig::read(&tsconfig_path)?;

        Ok(Some(Ok(Project {
            root,
            name: manifest.name,
            tsconfig,
        })))
    }
}

fn read_manifest(path: &Path) -> Result<PackageManifest, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Compile a source glob
///
/// # Errors
/// [`SynthesisError::InvalidGlob`] if the pattern does not compile.
pub fn source_matcher(pattern: &str) -> Result<globset::GlobMatcher, SynthesisError> {
    globset::GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| SynthesisError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Walk `root`, skipping hidden directories and `node_modules`
fn walk(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() || e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIP_DIRS.contains(&name.as_ref())
        })
        .filter_map(Result::ok)
}
