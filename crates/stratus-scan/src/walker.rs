//! Declaration walker
//!
//! Traverses a parsed source and yields one [`CapabilityBinding`] per type in
//! the `implements` clause of every eligible class.
//!
//! # Eligibility
//!
//! A declaration is eligible when it is exported, or when it sits directly
//! in the file's top level. Eligible namespaces are entered and their
//! members inherit that eligibility. Ambient (`declare`) declarations are
//! never visited.
//!
//! # Example
//!
//! ```rust
//! use stratus_annotations::CapabilityRegistry;
//! use stratus_scan::{DeclarationWalker, ParsedSource};
//!
//! let source = ParsedSource::parse(
//!     "items.ts",
//!     "export class Items implements LambdaResource<'ItemsFunction'> {}",
//! )
//! .unwrap();
//! let registry = CapabilityRegistry::standard();
//! let bindings: Vec<_> = DeclarationWalker::new(&registry).walk(&source).collect();
//!
//! assert_eq!(bindings[0].declaration, "Items");
//! assert_eq!(bindings[0].capability, "LambdaResource");
//! assert_eq!(bindings[0].parameters["Name"], "'ItemsFunction'");
//! ```

use crate::source::ParsedSource;
use std::collections::VecDeque;
use stratus_annotations::{CapabilityRegistry, RawParameters};
use tree_sitter::Node;

/// One capability implemented by one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBinding {
    /// Class name
    pub declaration: String,
    /// Ordinal of the class among eligible classes of the file
    pub declaration_index: usize,
    /// Last identifier of the implemented type
    pub capability: String,
    /// Type-argument source text keyed by slot name
    pub parameters: RawParameters,
    /// 1-based line of the implemented type
    pub line: usize,
}

/// Walks declarations using a capability registry for slot names
#[derive(Debug, Clone, Copy)]
pub struct DeclarationWalker<'r> {
    registry: &'r CapabilityRegistry,
}

impl<'r> DeclarationWalker<'r> {
    /// Create walker
    #[inline]
    #[must_use]
    pub fn new(registry: &'r CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Lazily iterate the bindings of `source` in source order
    #[must_use]
    pub fn walk<'s>(&self, source: &'s ParsedSource) -> CapabilityBindings<'s>
    where
        'r: 's,
    {
        let root = source.tree().root_node();
        let mut stack = Vec::new();
        push_children(&mut stack, root, true);
        CapabilityBindings {
            registry: self.registry,
            text: source.text(),
            stack,
            pending: VecDeque::new(),
            classes: 0,
        }
    }
}

/// Iterator returned by [`DeclarationWalker::walk`]
#[derive(Debug)]
pub struct CapabilityBindings<'s> {
    registry: &'s CapabilityRegistry,
    text: &'s str,
    /// Nodes still to visit, paired with "eligible through its container"
    stack: Vec<(Node<'s>, bool)>,
    pending: VecDeque<CapabilityBinding>,
    classes: usize,
}

impl Iterator for CapabilityBindings<'_> {
    type Item = CapabilityBinding;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(binding) = self.pending.pop_front() {
                return Some(binding);
            }
            let (node, contained) = self.stack.pop()?;
            self.visit(node, contained, false);
        }
    }
}

impl<'s> CapabilityBindings<'s> {
    fn visit(&mut self, node: Node<'s>, contained: bool, exported: bool) {
        let eligible = contained || exported;
        match node.kind() {
            "export_statement" => {
                if let Some(declaration) = node.child_by_field_name("declaration") {
                    self.visit(declaration, contained, true);
                } else if let Some(value) = node
                    .child_by_field_name("value")
                    .filter(|value| value.kind() == "class")
                {
                    // `export default class X ...` parsed as a class expression
                    self.visit_class(value);
                }
            }
            "expression_statement" => {
                for child in named_children(node) {
                    if matches!(child.kind(), "internal_module" | "module") {
                        self.visit(child, contained, exported);
                    }
                }
            }
            "internal_module" | "module" if eligible => {
                if let Some(body) = node.child_by_field_name("body") {
                    push_children(&mut self.stack, body, true);
                }
            }
            "class_declaration" | "abstract_class_declaration" if eligible => {
                self.visit_class(node);
            }
            _ => {}
        }
    }

    fn visit_class(&mut self, node: Node<'s>) {
        let Some(name) = node
            .child_by_field_name("name")
            .map(|n| self.text_of(n).to_string())
        else {
            return;
        };
        let declaration_index = self.classes;
        self.classes += 1;

        let implemented = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "class_heritage")
            .flat_map(named_children)
            .filter(|clause| clause.kind() == "implements_clause")
            .flat_map(named_children)
            .filter(|ty| ty.kind() != "comment");

        for ty in implemented {
            if let Some(binding) = self.bind(&name, declaration_index, ty) {
                self.pending.push_back(binding);
            }
        }
    }

    fn bind(&self, declaration: &str, declaration_index: usize, ty: Node<'s>) -> Option<CapabilityBinding> {
        let (name_node, arguments) = match ty.kind() {
            "generic_type" => (
                ty.child_by_field_name("name")?,
                ty.child_by_field_name("type_arguments")
                    .map(named_children)
                    .unwrap_or_default(),
            ),
            "type_identifier" | "nested_type_identifier" => (ty, Vec::new()),
            other => {
                tracing::debug!(
                    "Skipping implemented type of kind {} on {}",
                    other,
                    declaration
                );
                return None;
            }
        };
        let capability = self.last_identifier(name_node).to_string();

        let arguments: Vec<&str> = arguments
            .into_iter()
            .filter(|arg| arg.kind() != "comment")
            .map(|arg| self.text_of(arg).trim())
            .collect();

        let mut parameters = RawParameters::new();
        match self.registry.lookup(&capability) {
            Some(spec) => {
                if arguments.len() > spec.slots.len() {
                    tracing::debug!(
                        "{} on {}: dropping {} extra type argument(s)",
                        capability,
                        declaration,
                        arguments.len() - spec.slots.len()
                    );
                }
                for (slot, text) in spec.slots.iter().zip(&arguments) {
                    parameters.insert(slot.name.to_string(), (*text).to_string());
                }
            }
            None => {
                for (position, text) in arguments.iter().enumerate() {
                    parameters.insert(format!("${position}"), (*text).to_string());
                }
            }
        }

        Some(CapabilityBinding {
            declaration: declaration.to_string(),
            declaration_index,
            capability,
            parameters,
            line: ty.start_position().row + 1,
        })
    }

    /// `a.b.Name` → `Name`
    fn last_identifier(&self, node: Node<'s>) -> &'s str {
        match node.kind() {
            "nested_type_identifier" => node
                .child_by_field_name("name")
                .map_or_else(|| self.text_of(node), |name| self.text_of(name)),
            _ => self.text_of(node),
        }
    }

    fn text_of(&self, node: Node<'s>) -> &'s str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Push the named children of `node` so they pop in source order
fn push_children<'s>(stack: &mut Vec<(Node<'s>, bool)>, node: Node<'s>, contained: bool) {
    stack.extend(
        named_children(node)
            .into_iter()
            .rev()
            .map(|child| (child, contained)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bindings(text: &str) -> Vec<CapabilityBinding> {
        let source = ParsedSource::parse("test.ts", text).unwrap();
        let registry = CapabilityRegistry::standard();
        DeclarationWalker::new(&registry).walk(&source).collect()
    }

    fn summary(bindings: &[CapabilityBinding]) -> Vec<(String, String)> {
        bindings
            .iter()
            .map(|b| (b.declaration.clone(), b.capability.clone()))
            .collect()
    }

    #[test]
    fn exported_and_top_level_classes() {
        let found = bindings(
            r"
export class A implements LambdaResource<'A'> {}
class B implements LambdaResource<'B'> {}
export default class C implements LambdaResource<'C'> {}
",
        );
        assert_eq!(
            summary(&found),
            vec![
                ("A".into(), "LambdaResource".into()),
                ("B".into(), "LambdaResource".into()),
                ("C".into(), "LambdaResource".into()),
            ]
        );
        let indices: Vec<_> = found.iter().map(|b| b.declaration_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn namespace_members_inherit_eligibility() {
        let found = bindings(
            r"
export namespace Api {
  class Inner implements LambdaResource<'Inner'> {}
  export class Visible implements LambdaResource<'Visible'> {}
}
declare namespace Ambient {
  class Skipped implements LambdaResource<'Skipped'> {}
}
function f() {
  class Local implements LambdaResource<'Local'> {}
}
",
        );
        assert_eq!(
            summary(&found),
            vec![
                ("Inner".into(), "LambdaResource".into()),
                ("Visible".into(), "LambdaResource".into()),
            ]
        );
    }

    #[test]
    fn ambient_declarations_ignored() {
        let found = bindings("declare class D implements LambdaResource<'D'> {}\n");
        assert!(found.is_empty());
    }

    #[test]
    fn parameters_keyed_by_slot() {
        let found = bindings(
            "export class Items implements APIGatewayEventSource<'/items', 'List', 'get'> {}\n",
        );
        assert_eq!(found.len(), 1);
        let params = &found[0].parameters;
        assert_eq!(params["Path"], "'/items'");
        assert_eq!(params["Name"], "'List'");
        assert_eq!(params["Method"], "'get'");
        assert!(!params.contains_key("Auth"));
    }

    #[test]
    fn qualified_names_and_extends() {
        let found = bindings(
            r"
import * as lib from 'stratus';
export class Items extends Base implements lib.LambdaResource<'Items'>, Serializable, lib.LambdaTimeout<30> {}
",
        );
        assert_eq!(
            summary(&found),
            vec![
                ("Items".into(), "LambdaResource".into()),
                ("Items".into(), "Serializable".into()),
                ("Items".into(), "LambdaTimeout".into()),
            ]
        );
        assert!(found[1].parameters.is_empty());
        assert_eq!(found[2].parameters["Seconds"], "30");
    }

    #[test]
    fn unregistered_capability_keyed_by_position() {
        let found = bindings("export class A implements Mapper<'x', 42> {}\n");
        assert_eq!(found[0].parameters["$0"], "'x'");
        assert_eq!(found[0].parameters["$1"], "42");
    }

    #[test]
    fn extra_arguments_dropped() {
        let found = bindings("export class A implements LambdaTimeout<30, 40> {}\n");
        assert_eq!(found[0].parameters.len(), 1);
        assert_eq!(found[0].parameters["Seconds"], "30");
    }

    #[test]
    fn abstract_classes_and_lines() {
        let found = bindings("\n\nexport abstract class A implements LambdaResource<'A'> {}\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
    }

    #[test]
    fn same_name_distinct_indices() {
        let found = bindings(
            r"
namespace One { export class Fn implements LambdaResource<'One'> {} }
namespace Two { export class Fn implements LambdaResource<'Two'> {} }
",
        );
        assert_eq!(found.len(), 2);
        assert_ne!(found[0].declaration_index, found[1].declaration_index);
    }
}
