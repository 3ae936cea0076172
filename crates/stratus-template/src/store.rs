//! Document store
//!
//! Reads and writes one template file. Every load first copies the raw file
//! content to a sibling backup (`template.yaml.bak`), before any decoding,
//! so the last file state survives a failed decode or a bad merge.

use crate::codec::TagCodec;
use crate::document::TemplateDocument;
use crate::error::TemplateError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the template path for the backup copy
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// File-backed template store
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    backup_suffix: String,
}

impl DocumentStore {
    /// Create store for the template at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    /// Use a different backup suffix
    #[inline]
    #[must_use]
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// Template path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup path: the template path with the suffix appended
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(&self.backup_suffix);
        PathBuf::from(name)
    }

    /// Read the raw template text
    ///
    /// # Errors
    /// Returns [`TemplateError::Io`] if the file cannot be read.
    pub fn read_raw(&self) -> Result<String, TemplateError> {
        fs::read_to_string(&self.path).map_err(|e| TemplateError::io_error(&self.path, e))
    }

    /// Write `raw` verbatim to the backup path
    ///
    /// # Errors
    /// Returns [`TemplateError::Io`] if the backup cannot be written.
    pub fn backup(&self, raw: &str) -> Result<PathBuf, TemplateError> {
        let backup = self.backup_path();
        fs::write(&backup, raw).map_err(|e| TemplateError::io_error(&backup, e))?;
        tracing::debug!("Backed up {} to {}", self.path.display(), backup.display());
        Ok(backup)
    }

    /// Read, back up, then decode the template
    ///
    /// The backup is written before decoding, so it exists even when
    /// decoding fails.
    ///
    /// # Errors
    /// - [`TemplateError::Io`] on read or backup failure
    /// - any decode error from [`TagCodec::parse_str`]
    pub fn load(&self) -> Result<TemplateDocument, TemplateError> {
        let raw = self.read_raw()?;
        self.backup(&raw)?;
        let root = TagCodec::parse_str(&raw, &self.path)?;
        Ok(TemplateDocument::new(root))
    }

    /// Encode and overwrite the template
    ///
    /// Does not take another backup.
    ///
    /// # Errors
    /// - [`TemplateError::Serialize`] if encoding fails
    /// - [`TemplateError::Io`] if the file cannot be written
    pub fn save(&self, document: &TemplateDocument) -> Result<(), TemplateError> {
        let text = TagCodec::render(document.root())?;
        fs::write(&self.path, text).map_err(|e| TemplateError::io_error(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn backup_path_appends_suffix() {
        let store = DocumentStore::new("/tmp/project/template.yaml");
        assert_eq!(
            store.backup_path(),
            PathBuf::from("/tmp/project/template.yaml.bak")
        );

        let store = store.with_backup_suffix(".orig");
        assert_eq!(
            store.backup_path(),
            PathBuf::from("/tmp/project/template.yaml.orig")
        );
    }

    #[test]
    fn load_writes_backup_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        let raw = "# keep me\nResources:\n  A:   {Type: AWS::SNS::Topic}\n";
        fs::write(&path, raw).unwrap();

        let store = DocumentStore::new(&path);
        let doc = store.load().unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), raw);
        assert!(doc.resource("A").is_some());
    }

    #[test]
    fn backup_written_even_when_decode_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        let raw = "Value: !Join [a, b]\n";
        fs::write(&path, raw).unwrap();

        let store = DocumentStore::new(&path);
        assert!(matches!(store.load(), Err(TemplateError::UnknownTag { .. })));
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), raw);
    }

    #[test]
    fn missing_template_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("missing.yaml"));
        assert!(matches!(store.load(), Err(TemplateError::Io { .. })));
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn save_does_not_touch_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        fs::write(&path, "Resources: {}\n").unwrap();

        let store = DocumentStore::new(&path);
        let doc = store.load().unwrap();
        fs::write(store.backup_path(), "sentinel").unwrap();
        store.save(&doc).unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), "sentinel");
        let reloaded = TagCodec::parse_str(&fs::read_to_string(&path).unwrap(), &path).unwrap();
        assert_eq!(reloaded.get("Resources"), Some(&Value::mapping()));
    }
}
