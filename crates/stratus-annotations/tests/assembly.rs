//! Raw parameters through extraction and assembly.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stratus_annotations::{
    normalize_literal, AnnotationError, AnnotationExtractor, AnnotationRecord, CapabilityRegistry,
    RawParameters, ResourceAssembler,
};
use stratus_template::{TagReference, TemplateResource, Value};

fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn extract_all(
    declaration: &str,
    bindings: &[(&str, RawParameters)],
) -> Result<Vec<AnnotationRecord>, AnnotationError> {
    let registry = CapabilityRegistry::global();
    let extractor = AnnotationExtractor::new(registry, "/work/items", "/work/items/src/items.ts");
    let mut records = Vec::new();
    for (capability, parameters) in bindings {
        records.extend(extractor.extract(declaration, capability, parameters)?);
    }
    Ok(records)
}

proptest! {
    #[test]
    fn quoting_does_not_change_meaning(body in "[A-Za-z0-9_./-]{0,24}", pad in " {0,3}") {
        let single = format!("{pad}'{body}'{pad}");
        let double = format!("{pad}\"{body}\"{pad}");
        prop_assert_eq!(normalize_literal(&single), body.as_str());
        prop_assert_eq!(normalize_literal(&double), body.as_str());
        prop_assert_eq!(normalize_literal(&body), body.as_str());
    }
}

#[test]
fn get_items_route() {
    let records = extract_all(
        "Items",
        &[
            ("LambdaResource", raw(&[("Name", "'ItemsFunction'")])),
            (
                "APIGatewayEventSource",
                raw(&[("Path", "'/items'"), ("Method", "'get'")]),
            ),
            ("Serializable", raw(&[("$0", "Items")])),
        ],
    )
    .unwrap();
    assert_eq!(records.len(), 2);

    let descriptor = ResourceAssembler::new().assemble("Items", &records).unwrap();
    assert_eq!(descriptor.logical_name(), "ItemsFunction");
    assert_eq!(descriptor.resource_type(), "AWS::Serverless::Function");

    let props = Value::Mapping(descriptor.properties.clone());
    assert_eq!(props.get("CodeUri"), Some(&Value::from("items/")));
    assert_eq!(
        props.get("Handler"),
        Some(&Value::from("handlers/items_function.run"))
    );
    assert_eq!(props.get("Runtime"), Some(&Value::from("nodejs10.x")));
    assert_eq!(
        props.get_path("Events.ItemsAPI.Type"),
        Some(&Value::from("Api"))
    );
    assert_eq!(
        props.get_path("Events.ItemsAPI.Properties.Path"),
        Some(&Value::from("/items"))
    );
    assert_eq!(
        props.get_path("Events.ItemsAPI.Properties.Method"),
        Some(&Value::from("get"))
    );
}

#[test]
fn symbolic_role_and_environment() {
    let records = extract_all(
        "Orders",
        &[
            ("LambdaResource", raw(&[("Name", "\"OrdersFunction\"")])),
            ("LambdaRole", raw(&[("RoleArn", "'!GetAtt MyRole.Arn'")])),
            (
                "LambdaEnvironment",
                raw(&[("Key", "'TABLE'"), ("Value", "'!Ref OrdersTable'")]),
            ),
            (
                "LambdaEnvironment",
                raw(&[("Key", "'QUEUE'"), ("Value", "'!Sub ${AWS::StackName}-q'")]),
            ),
            ("LambdaMemorySize", raw(&[("Size", "256")])),
        ],
    )
    .unwrap();

    let descriptor = ResourceAssembler::new().assemble("Orders", &records).unwrap();
    let props = Value::Mapping(descriptor.properties);
    assert_eq!(
        props.get("Role"),
        Some(&Value::Tag(TagReference::get_attribute("MyRole", "Arn")))
    );
    assert_eq!(
        props.get_path("Environment.Variables.TABLE"),
        Some(&Value::Tag(TagReference::reference("OrdersTable")))
    );
    assert_eq!(
        props.get_path("Environment.Variables.QUEUE"),
        Some(&Value::Tag(TagReference::substitution("${AWS::StackName}-q")))
    );
    assert_eq!(props.get("MemorySize"), Some(&Value::from(256u32)));
}

#[test]
fn invalid_tracing_aborts() {
    let err = extract_all(
        "Items",
        &[
            ("LambdaResource", raw(&[("Name", "'ItemsFunction'")])),
            ("LambdaTracing", raw(&[("Mode", "'Invalid'")])),
        ],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "LambdaTracing: invalid value 'Invalid' for 'Mode', expected Active or PassThrough"
    );
}

#[test]
fn decorations_without_resource_produce_nothing() {
    let records = extract_all(
        "Helper",
        &[
            ("LambdaTimeout", raw(&[("Seconds", "10")])),
            ("LambdaTag", raw(&[("Key", "'team'"), ("Value", "'core'")])),
        ],
    )
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(ResourceAssembler::new().assemble("Helper", &records).is_none());
}
