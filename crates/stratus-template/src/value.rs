//! Document value model
//!
//! [`Value`] mirrors the YAML data model with one addition: [`TagReference`],
//! the symbolic scalars a SAM template uses to point at other resources.

use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};

/// Ordered string-keyed mapping
pub type Mapping = IndexMap<String, Value>;

/// Symbolic (non-literal) scalar
///
/// These are never interpreted by the engine; they are carried from an
/// annotation or an existing template entry into the written template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagReference {
    /// `!Ref Target`
    Ref {
        /// Logical name of the referenced resource or parameter
        target: String,
    },

    /// `!GetAtt Target.Attribute`
    GetAttribute {
        /// Logical name of the referenced resource
        target: String,
        /// Attribute of that resource
        attribute: String,
    },

    /// `!Sub template`
    Substitution {
        /// Template text with `${...}` placeholders
        template: String,
    },
}

impl TagReference {
    /// Reference to another resource
    #[inline]
    #[must_use]
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref {
            target: target.into(),
        }
    }

    /// Reference to an attribute of another resource
    #[inline]
    #[must_use]
    pub fn get_attribute(target: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAttribute {
            target: target.into(),
            attribute: attribute.into(),
        }
    }

    /// Substitution template
    #[inline]
    #[must_use]
    pub fn substitution(template: impl Into<String>) -> Self {
        Self::Substitution {
            template: template.into(),
        }
    }

    /// Tag name without the leading `!`
    #[inline]
    #[must_use]
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Ref { .. } => "Ref",
            Self::GetAttribute { .. } => "GetAtt",
            Self::Substitution { .. } => "Sub",
        }
    }

    /// Scalar payload as written after the tag
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Self::Ref { target } => target.clone(),
            Self::GetAttribute { target, attribute } => format!("{target}.{attribute}"),
            Self::Substitution { template } => template.clone(),
        }
    }
}

impl Display for TagReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "!{} {}", self.tag_name(), self.payload())
    }
}

/// Template value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `~` / `null`
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(serde_yaml::Number),
    /// String scalar
    String(String),
    /// Sequence
    Sequence(Vec<Value>),
    /// Ordered mapping
    Mapping(Mapping),
    /// Symbolic reference
    Tag(TagReference),
}

impl Value {
    /// Empty mapping value
    #[inline]
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Borrow as string, if this is a string scalar
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as mapping
    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Mutably borrow as mapping
    #[inline]
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as tag reference
    #[inline]
    #[must_use]
    pub fn as_tag(&self) -> Option<&TagReference> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Look up a key, if this is a mapping
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Look up a dot-separated path of mapping keys
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |current, segment| current.get(segment))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(u64::from(n).into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<TagReference> for Value {
    fn from(tag: TagReference) -> Self {
        Self::Tag(tag)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Self::Sequence(seq)
    }
}
