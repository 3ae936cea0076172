//! Annotation validation errors
//!
//! Every variant is fatal to a synthesis run: it means a class carries a
//! malformed capability declaration.

use stratus_template::TagError;

/// Errors raised while building annotation records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// A required slot was not bound or was empty
    #[error("{capability}: missing required parameter '{field}'")]
    MissingParameter {
        /// Capability name
        capability: String,
        /// Slot name
        field: String,
    },

    /// A slot value outside the accepted set
    #[error("{capability}: invalid value '{value}' for '{field}', expected {expected}")]
    InvalidParameter {
        /// Capability name
        capability: String,
        /// Slot name
        field: String,
        /// Value as written (quotes stripped)
        value: String,
        /// Description of the accepted values
        expected: String,
    },

    /// A symbolic slot with a malformed `!Ref`/`!GetAtt`/`!Sub` literal
    #[error("{capability}: malformed reference in '{field}': {source}")]
    MalformedReference {
        /// Capability name
        capability: String,
        /// Slot name
        field: String,
        /// Decode failure
        #[source]
        source: TagError,
    },
}

impl AnnotationError {
    /// Create missing parameter error
    pub fn missing(capability: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingParameter {
            capability: capability.into(),
            field: field.into(),
        }
    }

    /// Create invalid parameter error
    pub fn invalid(
        capability: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            capability: capability.into(),
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Slot the error refers to
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingParameter { field, .. }
            | Self::InvalidParameter { field, .. }
            | Self::MalformedReference { field, .. } => field,
        }
    }
}
