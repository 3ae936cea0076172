//! Scanning source files from disk.

use pretty_assertions::assert_eq;
use std::fs;
use stratus_annotations::CapabilityRegistry;
use stratus_scan::{DeclarationWalker, ParsedSource, ScanError};

const ITEMS: &str = r#"import { LambdaResource, APIGatewayEventSource, LambdaTag } from "stratus";

/** Lists items. */
export default class GetItems
  implements
    LambdaResource<"GetItemsFunction">,
    // route
    APIGatewayEventSource<"/items", "", "GET">,
    LambdaTag<"team", "catalog">
{
  async run(event: unknown): Promise<unknown> {
    return { statusCode: 200 };
  }
}

export class Helper {}
"#;

#[test]
fn reads_and_walks_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.ts");
    fs::write(&path, ITEMS).unwrap();

    let source = ParsedSource::read(&path).unwrap();
    assert_eq!(source.path(), path.as_path());

    let registry = CapabilityRegistry::standard();
    let bindings: Vec<_> = DeclarationWalker::new(&registry).walk(&source).collect();

    let capabilities: Vec<_> = bindings.iter().map(|b| b.capability.as_str()).collect();
    assert_eq!(
        capabilities,
        vec!["LambdaResource", "APIGatewayEventSource", "LambdaTag"]
    );
    assert!(bindings.iter().all(|b| b.declaration == "GetItems"));
    assert_eq!(bindings[1].parameters["Method"], "\"GET\"");
    assert_eq!(bindings[1].parameters["Name"], "\"\"");
    assert_eq!(bindings[2].parameters["Value"], "\"catalog\"");
    assert_eq!(bindings[0].line, 6);
}

#[test]
fn walking_twice_is_stable() {
    let source = ParsedSource::parse("items.ts", ITEMS).unwrap();
    let registry = CapabilityRegistry::standard();
    let walker = DeclarationWalker::new(&registry);
    let first: Vec<_> = walker.walk(&source).collect();
    let second: Vec<_> = walker.walk(&source).collect();
    assert_eq!(first, second);
}

#[test]
fn tsx_sources_parse() {
    let source = ParsedSource::parse(
        "view.tsx",
        "export class View implements LambdaResource<'View'> { render() { return <div/>; } }\n",
    )
    .unwrap();
    let registry = CapabilityRegistry::standard();
    assert_eq!(DeclarationWalker::new(&registry).walk(&source).count(), 1);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ParsedSource::read(dir.path().join("nope.ts")),
        Err(ScanError::Io { .. })
    ));
}
