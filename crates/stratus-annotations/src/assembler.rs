//! Resource assembly
//!
//! Folds all records of one class into a single [`ResourceDescriptor`].
//!
//! # Property order
//!
//! `CodeUri`, `Handler`, `Runtime`, `Environment`, `Tags`, `Events`, then
//! the remaining singleton properties in the order they were declared. A
//! repeated key keeps its first position and takes its last value.

use crate::descriptor::{handler_module_name, ResourceDescriptor, ResourceKind};
use crate::record::{AnnotationRecord, RecordKind};
use stratus_template::{Mapping, Value};

/// Runtime used when a function declares none
pub const DEFAULT_RUNTIME: &str = "nodejs10.x";

/// Handler directory relative to the code root
pub const DEFAULT_HANDLERS_DIR: &str = "handlers";

/// Function invoked by generated handler stubs
const HANDLER_EXPORT: &str = "run";

/// Builds descriptors from annotation records
#[derive(Debug, Clone)]
pub struct ResourceAssembler {
    default_runtime: String,
    handlers_dir: String,
}

impl Default for ResourceAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceAssembler {
    /// Create assembler with default runtime and handler directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_runtime: DEFAULT_RUNTIME.to_string(),
            handlers_dir: DEFAULT_HANDLERS_DIR.to_string(),
        }
    }

    /// Override the default runtime
    #[inline]
    #[must_use]
    pub fn with_default_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.default_runtime = runtime.into();
        self
    }

    /// Override the handler directory used in `Handler`
    #[inline]
    #[must_use]
    pub fn with_handlers_dir(mut self, dir: impl Into<String>) -> Self {
        self.handlers_dir = dir.into();
        self
    }

    /// Default runtime
    #[inline]
    #[must_use]
    pub fn default_runtime(&self) -> &str {
        &self.default_runtime
    }

    /// Assemble the resource for `declaration`
    ///
    /// Returns `None` when no record defines a resource. When several do,
    /// the first one wins.
    #[must_use]
    pub fn assemble(
        &self,
        declaration: &str,
        records: &[AnnotationRecord],
    ) -> Option<ResourceDescriptor> {
        let (name, origin) = records.iter().find_map(|record| match &record.kind {
            RecordKind::Function { name } => Some((name.clone(), record.origin.clone())),
            _ => None,
        })?;

        let mut variables = Mapping::new();
        let mut tags = Mapping::new();
        let mut events = Mapping::new();
        let mut singletons = Vec::new();

        for record in records {
            match &record.kind {
                RecordKind::Function { name: other } if *other != name => {
                    tracing::warn!(
                        "{} declares more than one resource; ignoring {}",
                        declaration,
                        other
                    );
                }
                RecordKind::Function { .. } => {}
                RecordKind::Environment { key, value } => {
                    variables.insert(key.clone(), value.clone());
                }
                RecordKind::Tag { key, value } => {
                    tags.insert(key.clone(), Value::from(value.as_str()));
                }
                RecordKind::Event(source) => {
                    events.insert(source.event_name(declaration), source.to_value());
                }
                kind => singletons.extend(kind.property()),
            }
        }

        let code_uri = origin
            .project
            .file_name()
            .map_or_else(|| "./".to_string(), |dir| format!("{}/", dir.to_string_lossy()));
        let handler = format!(
            "{}/{}.{}",
            self.handlers_dir,
            handler_module_name(declaration),
            HANDLER_EXPORT
        );

        let mut environment = Mapping::new();
        environment.insert("Variables".to_string(), Value::Mapping(variables));

        let mut properties = Mapping::new();
        properties.insert("CodeUri".to_string(), Value::from(code_uri));
        properties.insert("Handler".to_string(), Value::from(handler));
        properties.insert(
            "Runtime".to_string(),
            Value::from(self.default_runtime.as_str()),
        );
        properties.insert("Environment".to_string(), Value::Mapping(environment));
        properties.insert("Tags".to_string(), Value::Mapping(tags));
        properties.insert("Events".to_string(), Value::Mapping(events));
        for (key, value) in singletons {
            properties.insert(key.to_string(), value);
        }

        tracing::debug!(
            "Assembled {} from {} ({} records)",
            name,
            declaration,
            records.len()
        );

        Some(ResourceDescriptor {
            name,
            kind: ResourceKind::Function,
            properties,
            origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ApiEvent, EventSource, HttpMethod, Origin, TracingMode};
    use stratus_template::TagReference;

    fn record(kind: RecordKind) -> AnnotationRecord {
        AnnotationRecord::new(
            Origin::new("/work/items", "/work/items/src/items.ts", "Items"),
            kind,
        )
    }

    fn function(name: &str) -> AnnotationRecord {
        record(RecordKind::Function {
            name: name.to_string(),
        })
    }

    fn keys(mapping: &Mapping) -> Vec<&str> {
        mapping.keys().map(String::as_str).collect()
    }

    #[test]
    fn no_resource_record_yields_none() {
        let records = vec![record(RecordKind::Timeout(3))];
        assert!(ResourceAssembler::new().assemble("Items", &records).is_none());
    }

    #[test]
    fn base_properties() {
        let descriptor = ResourceAssembler::new()
            .assemble("Items", &[function("ItemsFunction")])
            .unwrap();
        assert_eq!(descriptor.name, "ItemsFunction");
        assert_eq!(descriptor.kind, ResourceKind::Function);
        assert_eq!(
            keys(&descriptor.properties),
            vec!["CodeUri", "Handler", "Runtime", "Environment", "Tags", "Events"]
        );
        assert_eq!(descriptor.properties["CodeUri"], Value::from("items/"));
        assert_eq!(
            descriptor.properties["Handler"],
            Value::from("handlers/items_function.run")
        );
        assert_eq!(descriptor.properties["Runtime"], Value::from("nodejs10.x"));
        assert_eq!(
            descriptor.properties["Environment"].get("Variables"),
            Some(&Value::mapping())
        );
    }

    #[test]
    fn explicit_runtime_keeps_position() {
        let records = vec![
            function("ItemsFunction"),
            record(RecordKind::Timeout(30)),
            record(RecordKind::Runtime("nodejs18.x".to_string())),
            record(RecordKind::Tracing(TracingMode::Active)),
        ];
        let descriptor = ResourceAssembler::new()
            .with_default_runtime("nodejs16.x")
            .assemble("Items", &records)
            .unwrap();
        assert_eq!(
            keys(&descriptor.properties),
            vec![
                "CodeUri",
                "Handler",
                "Runtime",
                "Environment",
                "Tags",
                "Events",
                "Timeout",
                "Tracing"
            ]
        );
        assert_eq!(descriptor.properties["Runtime"], Value::from("nodejs18.x"));
        assert_eq!(descriptor.properties["Timeout"], Value::from(30u32));
    }

    #[test]
    fn environment_tags_and_events() {
        let records = vec![
            record(RecordKind::Environment {
                key: "TABLE".to_string(),
                value: Value::Tag(TagReference::reference("ItemsTable")),
            }),
            function("ItemsFunction"),
            record(RecordKind::Tag {
                key: "team".to_string(),
                value: "a".to_string(),
            }),
            record(RecordKind::Tag {
                key: "team".to_string(),
                value: "b".to_string(),
            }),
            record(RecordKind::Event(EventSource::Api(ApiEvent {
                name: None,
                path: "/items".to_string(),
                method: HttpMethod::Get,
                authorizer: None,
                rest_api_id: None,
            }))),
            record(RecordKind::Event(EventSource::Schedule {
                name: Some("Nightly".to_string()),
                schedule: "cron(0 0 * * ? *)".to_string(),
            })),
        ];
        let descriptor = ResourceAssembler::new().assemble("Items", &records).unwrap();
        let props = Value::Mapping(descriptor.properties);

        assert_eq!(
            props.get_path("Environment.Variables.TABLE"),
            Some(&Value::Tag(TagReference::reference("ItemsTable")))
        );
        assert_eq!(props.get_path("Tags.team"), Some(&Value::from("b")));
        assert_eq!(
            props.get_path("Events.ItemsAPI.Properties.Method"),
            Some(&Value::from("get"))
        );
        assert_eq!(
            props.get_path("Events.Nightly.Type"),
            Some(&Value::from("Schedule"))
        );
    }

    #[test]
    fn first_resource_record_wins() {
        let records = vec![function("First"), function("Second")];
        let descriptor = ResourceAssembler::new().assemble("Items", &records).unwrap();
        assert_eq!(descriptor.name, "First");
    }

    #[test]
    fn custom_handlers_dir() {
        let descriptor = ResourceAssembler::new()
            .with_handlers_dir("lambda")
            .assemble("Items", &[function("ItemsFunction")])
            .unwrap();
        assert_eq!(
            descriptor.properties["Handler"],
            Value::from("lambda/items_function.run")
        );
    }
}
