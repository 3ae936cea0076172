//! Annotation extraction
//!
//! Normalizes the raw type-argument text bound to a capability and hands it
//! to the registered constructor.

use crate::error::AnnotationError;
use crate::record::{AnnotationRecord, Origin};
use crate::registry::{CapabilityRegistry, Parameters};
use indexmap::IndexMap;
use std::path::PathBuf;
use stratus_template::{TagCodec, Value};

/// Raw type-argument source text keyed by slot name
pub type RawParameters = IndexMap<String, String>;

/// Trim `text` and strip one pair of matching `'` or `"` quotes
///
/// ```rust
/// use stratus_annotations::normalize_literal;
///
/// assert_eq!(normalize_literal(" 'nodejs18.x' "), "nodejs18.x");
/// assert_eq!(normalize_literal("\"a'"), "\"a'");
/// assert_eq!(normalize_literal("512"), "512");
/// ```
#[must_use]
pub fn normalize_literal(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Builds records for classes of one source file
#[derive(Debug, Clone)]
pub struct AnnotationExtractor<'r> {
    registry: &'r CapabilityRegistry,
    project: PathBuf,
    file: PathBuf,
}

impl<'r> AnnotationExtractor<'r> {
    /// Create extractor for `file` within `project`
    #[must_use]
    pub fn new(
        registry: &'r CapabilityRegistry,
        project: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            project: project.into(),
            file: file.into(),
        }
    }

    /// Build the record for one capability instance on `declaration`
    ///
    /// Returns `Ok(None)` for capabilities the registry does not know.
    ///
    /// # Errors
    /// - [`AnnotationError::MalformedReference`] for a bad reference literal
    ///   in a symbolic slot
    /// - any constructor validation error
    pub fn extract(
        &self,
        declaration: &str,
        capability: &str,
        raw: &RawParameters,
    ) -> Result<Option<AnnotationRecord>, AnnotationError> {
        let Some(spec) = self.registry.lookup(capability) else {
            tracing::debug!(
                "Ignoring unregistered capability {} on {} in {}",
                capability,
                declaration,
                self.file.display()
            );
            return Ok(None);
        };

        let mut parameters = Parameters::new(&spec.name);
        for (slot_name, text) in raw {
            let text = normalize_literal(text);
            let symbolic = spec.slot_named(slot_name).is_some_and(|slot| slot.symbolic);
            let value = if symbolic {
                match TagCodec::decode_literal(text) {
                    Ok(Some(tag)) => Value::Tag(tag),
                    Ok(None) => Value::from(text),
                    Err(source) => {
                        return Err(AnnotationError::MalformedReference {
                            capability: spec.name.clone(),
                            field: slot_name.clone(),
                            source,
                        })
                    }
                }
            } else {
                Value::from(text)
            };
            parameters.insert(slot_name.as_str(), value);
        }

        let origin = Origin::new(&self.project, &self.file, declaration);
        let record = spec.construct(origin, &parameters)?;
        tracing::debug!(
            "Extracted {} on {}: {:?}",
            capability,
            declaration,
            record.role()
        );
        Ok(Some(record))
    }
}
