//! Capability registry
//!
//! Maps a capability interface name to its ordered parameter slots and the
//! constructor that turns bound parameters into a record. Lookups are by
//! the last identifier of the implemented type, so `lib.LambdaResource` and
//! `LambdaResource` resolve to the same entry.

use crate::capabilities;
use crate::error::AnnotationError;
use crate::record::{AnnotationRecord, Origin, RecordKind};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;
use stratus_template::Value;

/// Record constructor for one capability
pub type RecordConstructor = fn(&Origin, &Parameters) -> Result<RecordKind, AnnotationError>;

/// One positional type parameter of a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Slot name, used as the parameter key
    pub name: &'static str,
    /// Slot may hold a `!Ref`/`!GetAtt`/`!Sub` literal
    pub symbolic: bool,
}

impl Slot {
    /// Plain text slot
    #[inline]
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            symbolic: false,
        }
    }

    /// Slot accepting a symbolic reference
    #[inline]
    #[must_use]
    pub const fn symbolic(name: &'static str) -> Self {
        Self {
            name,
            symbolic: true,
        }
    }
}

/// Registered capability
#[derive(Debug, Clone)]
pub struct CapabilitySpec {
    /// Interface name
    pub name: String,
    /// Ordered slots
    pub slots: Vec<Slot>,
    constructor: RecordConstructor,
}

impl CapabilitySpec {
    /// Create capability spec
    #[must_use]
    pub fn new(name: impl Into<String>, slots: Vec<Slot>, constructor: RecordConstructor) -> Self {
        Self {
            name: name.into(),
            slots,
            constructor,
        }
    }

    /// Slot at `position`
    #[inline]
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<&Slot> {
        self.slots.get(position)
    }

    /// Slot by name
    #[must_use]
    pub fn slot_named(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Build the record for `origin` from bound parameters
    ///
    /// # Errors
    /// Returns whatever validation error the constructor raises.
    pub fn construct(
        &self,
        origin: Origin,
        parameters: &Parameters,
    ) -> Result<AnnotationRecord, AnnotationError> {
        let kind = (self.constructor)(&origin, parameters)?;
        Ok(AnnotationRecord::new(origin, kind))
    }
}

/// Normalized parameters bound to one capability instance
///
/// Plain slots hold [`Value::String`]; symbolic slots hold either a string
/// or a [`Value::Tag`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    capability: String,
    values: IndexMap<String, Value>,
}

impl Parameters {
    /// Empty parameter set for `capability`
    #[must_use]
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            values: IndexMap::new(),
        }
    }

    /// Bind a slot value
    #[must_use]
    pub fn with(mut self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(slot, value);
        self
    }

    /// Bind a slot value in place
    pub fn insert(&mut self, slot: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(slot.into(), value.into());
    }

    /// Capability these parameters belong to
    #[inline]
    #[must_use]
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Bound value; empty strings count as unbound
    #[must_use]
    pub fn value(&self, slot: &str) -> Option<&Value> {
        self.values
            .get(slot)
            .filter(|value| value.as_str().map_or(true, |text| !text.is_empty()))
    }

    /// Bound text; empty strings count as unbound
    #[must_use]
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.value(slot).and_then(Value::as_str)
    }

    /// Bound value, or [`AnnotationError::MissingParameter`]
    ///
    /// # Errors
    /// Fails when the slot is unbound or empty.
    pub fn required_value(&self, slot: &str) -> Result<&Value, AnnotationError> {
        self.value(slot)
            .ok_or_else(|| AnnotationError::missing(&self.capability, slot))
    }

    /// Bound text, or [`AnnotationError::MissingParameter`]
    ///
    /// # Errors
    /// Fails when the slot is unbound, empty, or holds a reference.
    pub fn required_text(&self, slot: &str) -> Result<&str, AnnotationError> {
        self.text(slot)
            .ok_or_else(|| AnnotationError::missing(&self.capability, slot))
    }

    /// Parse a bound text slot
    ///
    /// Returns `Ok(None)` when the slot is unbound.
    ///
    /// # Errors
    /// [`AnnotationError::InvalidParameter`] naming `expected` when parsing
    /// fails.
    pub fn parse<T: FromStr>(&self, slot: &str, expected: &str) -> Result<Option<T>, AnnotationError> {
        match self.text(slot) {
            None => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|_| AnnotationError::invalid(&self.capability, slot, text, expected)),
        }
    }

    /// Number of bound slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is bound
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

static GLOBAL: Lazy<CapabilityRegistry> = Lazy::new(CapabilityRegistry::standard);

/// Registry of known capabilities
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    specs: HashMap<String, CapabilitySpec>,
}

impl CapabilityRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard function and event capabilities
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in capabilities::standard() {
            registry.register(spec);
        }
        registry
    }

    /// Process-wide standard registry
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register a capability, replacing any entry with the same name
    pub fn register(&mut self, spec: CapabilitySpec) -> Option<CapabilitySpec> {
        tracing::debug!("Registering capability: {}", spec.name);
        self.specs.insert(spec.name.clone(), spec)
    }

    /// Look up a capability by interface name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&CapabilitySpec> {
        self.specs.get(name)
    }

    /// True if `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered capabilities
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
