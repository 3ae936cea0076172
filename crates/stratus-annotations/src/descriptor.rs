//! Resource descriptors

use crate::record::Origin;
use std::fmt::{self, Display, Formatter};
use stratus_template::{Mapping, TemplateResource};

/// Handler module base name for a class: `<lowercase class>_function`
///
/// ```rust
/// assert_eq!(stratus_annotations::handler_module_name("GetItems"), "getitems_function");
/// ```
#[must_use]
pub fn handler_module_name(declaration: &str) -> String {
    format!("{}_function", declaration.to_lowercase())
}

/// Template resource types produced by assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `AWS::Serverless::Function`
    Function,
}

impl ResourceKind {
    /// Template `Type` string
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Function => "AWS::Serverless::Function",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One template resource derived from one annotated class
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    /// Logical name under `Resources`
    pub name: String,
    /// Resource type
    pub kind: ResourceKind,
    /// Ordered properties
    pub properties: Mapping,
    /// Class the resource was derived from
    pub origin: Origin,
}

impl ResourceDescriptor {
    /// Handler module base name for the originating class
    #[inline]
    #[must_use]
    pub fn handler_module(&self) -> String {
        handler_module_name(&self.origin.declaration)
    }
}

impl TemplateResource for ResourceDescriptor {
    fn logical_name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> &str {
        self.kind.type_name()
    }

    fn properties(&self) -> &Mapping {
        &self.properties
    }
}
