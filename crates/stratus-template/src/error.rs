//! Error types for the template layer
//!
//! Provides error handling for:
//! - Symbolic reference literals (`!Ref`, `!GetAtt`, `!Sub`)
//! - Document decode/encode
//! - Template file IO

use std::path::PathBuf;

/// Errors while decoding a symbolic reference literal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// Tag marker present but nothing follows it
    #[error("'!{tag}' requires a payload")]
    MissingPayload {
        /// Tag name without the leading `!`
        tag: &'static str,
    },

    /// `!GetAtt` payload is not of the form `Target.Attribute`
    #[error("'!GetAtt {payload}' must be of the form Target.Attribute")]
    MissingAttribute {
        /// The offending payload
        payload: String,
    },
}

/// Errors while loading, merging or saving a template document
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// IO error reading or writing a template file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML syntax error
    #[error("syntax error in {path}: {message}")]
    Syntax {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A YAML tag this layer does not understand
    #[error("unrecognized tag '{tag}'")]
    UnknownTag {
        /// Tag as written, including `!`
        tag: String,
    },

    /// A known tag whose payload is not a scalar
    #[error("tag '{tag}' must carry a scalar payload")]
    UnsupportedTagForm {
        /// Tag as written, including `!`
        tag: String,
    },

    /// A known tag with a malformed payload
    #[error("malformed reference: {0}")]
    MalformedReference(#[from] TagError),

    /// Mapping key that is itself a mapping or sequence
    #[error("mapping keys must be scalars")]
    NonScalarKey,

    /// Expected a mapping at the given location
    #[error("expected a mapping at {0}")]
    NotAMapping(String),

    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl TemplateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create syntax error for path
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_error_display() {
        let err = TagError::MissingPayload { tag: "Ref" };
        assert_eq!(err.to_string(), "'!Ref' requires a payload");

        let err = TagError::MissingAttribute {
            payload: "MyRole".to_string(),
        };
        assert!(err.to_string().contains("Target.Attribute"));
    }

    #[test]
    fn template_error_conversions() {
        let tag_err = TagError::MissingPayload { tag: "Sub" };
        let err: TemplateError = tag_err.into();
        assert!(matches!(err, TemplateError::MalformedReference(_)));
    }

    #[test]
    fn unknown_tag_display() {
        let err = TemplateError::UnknownTag {
            tag: "!Join".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized tag '!Join'");
    }
}
