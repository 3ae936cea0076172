//! Template document
//!
//! A free-form [`Value`] tree of which only the top-level `Resources` mapping
//! is ever modified. Everything else is carried through untouched.

use crate::error::TemplateError;
use crate::value::{Mapping, Value};

/// Top-level key holding the resource mapping
pub const RESOURCES_KEY: &str = "Resources";

/// Something that can be merged into the `Resources` mapping
///
/// Implemented by the synthesis engine's resource descriptors; kept as a
/// trait so this crate does not depend on how resources are produced.
pub trait TemplateResource {
    /// Logical name (key under `Resources`)
    fn logical_name(&self) -> &str;

    /// Resource `Type` string, e.g. `AWS::Serverless::Function`
    fn resource_type(&self) -> &str;

    /// Resource `Properties`
    fn properties(&self) -> &Mapping;
}

/// Outcome of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Names that were not in the document before the merge
    pub inserted: Vec<String>,
    /// Names that were in the document before the merge
    pub replaced: Vec<String>,
}

impl MergeReport {
    /// Total number of entries written
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserted.len() + self.replaced.len()
    }

    /// Check if nothing was written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.replaced.is_empty()
    }
}

/// In-memory template document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateDocument {
    root: Value,
}

impl TemplateDocument {
    /// Wrap a decoded value tree
    #[inline]
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Document root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consume into the root value
    #[inline]
    #[must_use]
    pub fn into_root(self) -> Value {
        self.root
    }

    /// The `Resources` mapping, if present
    #[inline]
    #[must_use]
    pub fn resources(&self) -> Option<&Mapping> {
        self.root.get(RESOURCES_KEY).and_then(Value::as_mapping)
    }

    /// A single resource entry by logical name
    #[inline]
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Value> {
        self.resources().and_then(|resources| resources.get(name))
    }

    /// Get value at dot-separated path
    #[inline]
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.root.get_path(path)
    }

    /// Merge resources into the `Resources` mapping
    ///
    /// Each resource replaces any entry with the same logical name; entries
    /// not named by `resources` and everything outside `Resources` are left
    /// as they are. When two resources share a name the later one wins.
    ///
    /// # Errors
    /// Returns [`TemplateError::NotAMapping`] if the document root or an
    /// existing `Resources` value is not a mapping.
    pub fn merge<'a, R, I>(&mut self, resources: I) -> Result<MergeReport, TemplateError>
    where
        R: TemplateResource + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let target = self.resources_mut()?;
        let mut report = MergeReport::default();

        for resource in resources {
            let name = resource.logical_name().to_string();
            let entry = resource_entry(resource);
            match target.insert(name.clone(), entry) {
                Some(_) => {
                    tracing::debug!("Replaced resource {}", name);
                    if !report.inserted.contains(&name) && !report.replaced.contains(&name) {
                        report.replaced.push(name);
                    }
                }
                None => {
                    tracing::debug!("Inserted resource {}", name);
                    report.inserted.push(name);
                }
            }
        }

        Ok(report)
    }

    /// Mutable `Resources` mapping, created if absent
    fn resources_mut(&mut self) -> Result<&mut Mapping, TemplateError> {
        if matches!(self.root, Value::Null) {
            self.root = Value::mapping();
        }
        let root = self
            .root
            .as_mapping_mut()
            .ok_or_else(|| TemplateError::NotAMapping("document root".to_string()))?;
        let resources = root
            .entry(RESOURCES_KEY.to_string())
            .or_insert_with(Value::mapping);
        // `Resources:` with no entries decodes as null
        if matches!(resources, Value::Null) {
            *resources = Value::mapping();
        }
        resources
            .as_mapping_mut()
            .ok_or_else(|| TemplateError::NotAMapping(RESOURCES_KEY.to_string()))
    }
}

impl From<Value> for TemplateDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

fn resource_entry<R: TemplateResource + ?Sized>(resource: &R) -> Value {
    let mut entry = Mapping::new();
    entry.insert("Type".to_string(), Value::from(resource.resource_type()));
    entry.insert(
        "Properties".to_string(),
        Value::Mapping(resource.properties().clone()),
    );
    Value::Mapping(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TagCodec;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    struct Entry {
        name: &'static str,
        properties: Mapping,
    }

    impl Entry {
        fn new(name: &'static str, runtime: &str) -> Self {
            let mut properties = Mapping::new();
            properties.insert("Runtime".to_string(), Value::from(runtime));
            Self { name, properties }
        }
    }

    impl TemplateResource for Entry {
        fn logical_name(&self) -> &str {
            self.name
        }

        fn resource_type(&self) -> &str {
            "AWS::Serverless::Function"
        }

        fn properties(&self) -> &Mapping {
            &self.properties
        }
    }

    fn parse(text: &str) -> TemplateDocument {
        TemplateDocument::new(TagCodec::parse_str(text, Path::new("template.yaml")).unwrap())
    }

    #[test]
    fn merge_inserts_into_existing_resources() {
        let mut doc = parse(
            r"
AWSTemplateFormatVersion: '2010-09-09'
Resources:
  Existing:
    Type: AWS::S3::Bucket
",
        );
        let report = doc.merge(&[Entry::new("Fn", "nodejs10.x")]).unwrap();

        assert_eq!(report.inserted, vec!["Fn".to_string()]);
        assert!(report.replaced.is_empty());
        assert!(doc.resource("Existing").is_some());
        assert_eq!(
            doc.get_path("Resources.Fn.Properties.Runtime"),
            Some(&Value::from("nodejs10.x"))
        );
        assert_eq!(
            doc.get_path("Resources.Fn.Type"),
            Some(&Value::from("AWS::Serverless::Function"))
        );
    }

    #[test]
    fn merge_creates_resources_when_absent() {
        let mut doc = parse("Transform: AWS::Serverless-2016-10-31\n");
        doc.merge(&[Entry::new("Fn", "nodejs10.x")]).unwrap();
        assert!(doc.resource("Fn").is_some());

        let mut empty = TemplateDocument::default();
        empty.merge(&[Entry::new("Fn", "nodejs10.x")]).unwrap();
        assert!(empty.resource("Fn").is_some());
    }

    #[test]
    fn merge_last_write_wins() {
        let mut doc = parse("Resources: {}\n");
        let report = doc
            .merge(&[Entry::new("Fn", "nodejs8.10"), Entry::new("Fn", "nodejs10.x")])
            .unwrap();

        assert_eq!(
            doc.get_path("Resources.Fn.Properties.Runtime"),
            Some(&Value::from("nodejs10.x"))
        );
        assert_eq!(report.inserted, vec!["Fn".to_string()]);
        assert!(report.replaced.is_empty());
        assert_eq!(report.len(), 1);

        let report = doc.merge(&[Entry::new("Fn", "python3.8")]).unwrap();
        assert_eq!(report.replaced, vec!["Fn".to_string()]);
    }

    #[test]
    fn merge_is_idempotent() {
        let entries = [Entry::new("A", "nodejs10.x"), Entry::new("B", "python3.8")];
        let mut once = parse("Resources:\n  Keep:\n    Type: AWS::SNS::Topic\n");
        once.merge(&entries).unwrap();
        let mut twice = once.clone();
        twice.merge(&entries).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_rejects_non_mapping_resources() {
        let mut doc = parse("Resources: [a, b]\n");
        let err = doc.merge(&[Entry::new("Fn", "nodejs10.x")]).unwrap_err();
        assert!(matches!(err, TemplateError::NotAMapping(ref at) if at == "Resources"));

        let mut doc = parse("- just\n- a list\n");
        assert!(doc.merge(&[Entry::new("Fn", "nodejs10.x")]).is_err());
    }
}
