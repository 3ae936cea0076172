//! Tag codec
//!
//! Converts between the textual forms of the three symbolic scalars and
//! [`TagReference`]. Two textual forms exist:
//!
//! - **Literal**: the whole reference as one string, as written inside an
//!   annotation (`"!GetAtt MyRole.Arn"`)
//! - **YAML**: a tagged scalar node in the template (`Role: !GetAtt MyRole.Arn`)
//!
//! Both use the same marker names and payload syntax, so a reference written
//! in source code ends up in the template exactly as it was written.

use crate::error::{TagError, TemplateError};
use crate::value::{Mapping, TagReference, Value};
use serde_yaml::value::{Tag, TaggedValue};
use std::path::Path;

type YamlValue = serde_yaml::Value;

/// Encoder/decoder for symbolic tag references
#[derive(Debug, Clone, Copy, Default)]
pub struct TagCodec;

impl TagCodec {
    /// Decode an annotation literal
    ///
    /// Returns `Ok(None)` when the text does not start with a recognized
    /// marker; such text is a plain string.
    ///
    /// # Errors
    /// Returns [`TagError`] when a recognized marker has a malformed payload.
    pub fn decode_literal(text: &str) -> Result<Option<TagReference>, TagError> {
        let Some(rest) = text.trim_start().strip_prefix('!') else {
            return Ok(None);
        };
        let (marker, payload) = match rest.split_once(char::is_whitespace) {
            Some((marker, payload)) => (marker, payload.trim()),
            None => (rest.trim_end(), ""),
        };
        match marker {
            "Ref" | "GetAtt" | "Sub" => Self::from_parts(marker, payload).map(Some),
            _ => Ok(None),
        }
    }

    /// Encode a reference as an annotation literal
    #[inline]
    #[must_use]
    pub fn encode_literal(tag: &TagReference) -> String {
        tag.to_string()
    }

    /// Build a reference from a marker name and its payload
    ///
    /// The payload is stored as given; blank payloads and `GetAtt` payloads
    /// without a `Target.Attribute` shape are rejected.
    fn from_parts(marker: &str, payload: &str) -> Result<TagReference, TagError> {
        let tag = match marker {
            "Ref" => "Ref",
            "GetAtt" => "GetAtt",
            _ => "Sub",
        };
        if payload.trim().is_empty() {
            return Err(TagError::MissingPayload { tag });
        }
        match tag {
            "Ref" => Ok(TagReference::reference(payload)),
            "GetAtt" => match payload.split_once('.') {
                Some((target, attribute))
                    if !target.trim().is_empty() && !attribute.trim().is_empty() =>
                {
                    Ok(TagReference::get_attribute(target, attribute))
                }
                _ => Err(TagError::MissingAttribute {
                    payload: payload.to_string(),
                }),
            },
            _ => Ok(TagReference::substitution(payload)),
        }
    }

    /// Parse YAML text into a [`Value`] tree
    ///
    /// # Errors
    /// - [`TemplateError::Syntax`] for invalid YAML
    /// - [`TemplateError::UnknownTag`] / [`TemplateError::UnsupportedTagForm`]
    ///   for tags this codec cannot represent
    pub fn parse_str(text: &str, path: &Path) -> Result<Value, TemplateError> {
        let yaml: YamlValue = serde_yaml::from_str(text)
            .map_err(|e| TemplateError::syntax_error(path, e.to_string()))?;
        Self::decode_yaml(yaml)
    }

    /// Render a [`Value`] tree as YAML text
    ///
    /// # Errors
    /// Returns [`TemplateError::Serialize`] if the emitter fails.
    pub fn render(value: &Value) -> Result<String, TemplateError> {
        serde_yaml::to_string(&Self::encode_yaml(value))
            .map_err(|e| TemplateError::Serialize(e.to_string()))
    }

    /// Decode a YAML node, resolving symbolic tags
    ///
    /// # Errors
    /// See [`TagCodec::parse_str`].
    pub fn decode_yaml(yaml: YamlValue) -> Result<Value, TemplateError> {
        Ok(match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Number(n) => Value::Number(n),
            YamlValue::String(s) => Value::String(s),
            YamlValue::Sequence(seq) => Value::Sequence(
                seq.into_iter()
                    .map(Self::decode_yaml)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            YamlValue::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(decode_key(key)?, Self::decode_yaml(value)?);
                }
                Value::Mapping(out)
            }
            YamlValue::Tagged(tagged) => Value::Tag(decode_tagged(*tagged)?),
        })
    }

    /// Encode a [`Value`] as a YAML node
    #[must_use]
    pub fn encode_yaml(value: &Value) -> YamlValue {
        match value {
            Value::Null => YamlValue::Null,
            Value::Bool(b) => YamlValue::Bool(*b),
            Value::Number(n) => YamlValue::Number(n.clone()),
            Value::String(s) => YamlValue::String(s.clone()),
            Value::Sequence(seq) => YamlValue::Sequence(seq.iter().map(Self::encode_yaml).collect()),
            Value::Mapping(map) => {
                let mut out = serde_yaml::Mapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(YamlValue::String(key.clone()), Self::encode_yaml(value));
                }
                YamlValue::Mapping(out)
            }
            Value::Tag(tag) => YamlValue::Tagged(Box::new(TaggedValue {
                tag: Tag::new(tag.tag_name()),
                value: YamlValue::String(tag.payload()),
            })),
        }
    }
}

/// Scalar keys are stringified; structured keys cannot be represented
fn decode_key(key: YamlValue) -> Result<String, TemplateError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        _ => Err(TemplateError::NonScalarKey),
    }
}

fn decode_tagged(tagged: TaggedValue) -> Result<TagReference, TemplateError> {
    let written = tagged.tag.to_string();
    let marker = written.trim_start_matches('!');
    if !matches!(marker, "Ref" | "GetAtt" | "Sub") {
        return Err(TemplateError::UnknownTag { tag: written });
    }
    let payload = match tagged.value {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        _ => return Err(TemplateError::UnsupportedTagForm { tag: written }),
    };
    // scalar text is kept verbatim so untouched entries render as loaded
    Ok(TagCodec::from_parts(marker, &payload)?)
}
