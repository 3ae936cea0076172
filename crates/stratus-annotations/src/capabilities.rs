//! Standard capabilities
//!
//! The function capabilities (`Lambda*`) and the event source capabilities
//! recognized by [`CapabilityRegistry::standard`](crate::CapabilityRegistry::standard),
//! with their record constructors.

use crate::error::AnnotationError;
use crate::record::{ApiEvent, EventSource, HttpMethod, Origin, RecordKind, TracingMode};
use crate::registry::{CapabilitySpec, Parameters, Slot};
use stratus_template::Value;

/// `Auth` value meaning "no authorizer"
pub const NO_AUTHORIZER: &str = "NONE";

/// Standard capability table
#[must_use]
pub fn standard() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::new("LambdaResource", vec![Slot::text("Name")], function),
        CapabilitySpec::new("LambdaRuntime", vec![Slot::text("Runtime")], runtime),
        CapabilitySpec::new("LambdaMemorySize", vec![Slot::text("Size")], memory_size),
        CapabilitySpec::new("LambdaTimeout", vec![Slot::text("Seconds")], timeout),
        CapabilitySpec::new("LambdaRole", vec![Slot::symbolic("RoleArn")], role),
        CapabilitySpec::new("LambdaTracing", vec![Slot::text("Mode")], tracing_mode),
        CapabilitySpec::new(
            "LambdaEnvironment",
            vec![Slot::text("Key"), Slot::symbolic("Value")],
            environment,
        ),
        CapabilitySpec::new(
            "LambdaTag",
            vec![Slot::text("Key"), Slot::text("Value")],
            tag,
        ),
        CapabilitySpec::new(
            "APIGatewayEventSource",
            vec![
                Slot::text("Path"),
                Slot::text("Name"),
                Slot::text("Method"),
                Slot::text("Auth"),
                Slot::symbolic("RestApiId"),
            ],
            api_event,
        ),
        CapabilitySpec::new(
            "SNSEventSource",
            vec![Slot::symbolic("Topic"), Slot::text("Name")],
            topic_event,
        ),
        CapabilitySpec::new(
            "ScheduleEvent",
            vec![Slot::text("Schedule"), Slot::text("Name")],
            schedule_event,
        ),
        CapabilitySpec::new(
            "S3Event",
            vec![Slot::symbolic("Bucket"), Slot::text("Event"), Slot::text("Name")],
            bucket_event,
        ),
    ]
}

fn function(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Function {
        name: parameters.required_text("Name")?.to_string(),
    })
}

fn runtime(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Runtime(
        parameters.required_text("Runtime")?.to_string(),
    ))
}

fn positive(parameters: &Parameters, slot: &str) -> Result<u32, AnnotationError> {
    const EXPECTED: &str = "a positive integer";
    let text = parameters.required_text(slot)?;
    match parameters.parse::<u32>(slot, EXPECTED)? {
        Some(n) if n > 0 => Ok(n),
        _ => Err(AnnotationError::invalid(
            parameters.capability(),
            slot,
            text,
            EXPECTED,
        )),
    }
}

fn memory_size(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    positive(parameters, "Size").map(RecordKind::MemorySize)
}

fn timeout(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    positive(parameters, "Seconds").map(RecordKind::Timeout)
}

fn role(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Role(parameters.required_value("RoleArn")?.clone()))
}

fn tracing_mode(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    parameters.required_text("Mode")?;
    parameters
        .parse::<TracingMode>("Mode", "Active or PassThrough")?
        .map(RecordKind::Tracing)
        .ok_or_else(|| AnnotationError::missing(parameters.capability(), "Mode"))
}

fn environment(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Environment {
        key: parameters.required_text("Key")?.to_string(),
        value: parameters
            .value("Value")
            .cloned()
            .unwrap_or_else(|| Value::from("")),
    })
}

fn tag(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Tag {
        key: parameters.required_text("Key")?.to_string(),
        value: parameters.text("Value").unwrap_or_default().to_string(),
    })
}

fn event_name(parameters: &Parameters) -> Option<String> {
    parameters.text("Name").map(str::to_string)
}

fn api_event(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    let path = parameters.required_text("Path")?.to_string();
    let method = parameters
        .parse::<HttpMethod>("Method", "one of get, head, post, put, patch, delete, options, any")?
        .unwrap_or_default();
    let authorizer = parameters
        .text("Auth")
        .filter(|auth| *auth != NO_AUTHORIZER)
        .map(str::to_string);

    Ok(RecordKind::Event(EventSource::Api(ApiEvent {
        name: event_name(parameters),
        path,
        method,
        authorizer,
        rest_api_id: parameters.value("RestApiId").cloned(),
    })))
}

fn topic_event(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Event(EventSource::Topic {
        name: event_name(parameters),
        topic: parameters.required_value("Topic")?.clone(),
    }))
}

fn schedule_event(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Event(EventSource::Schedule {
        name: event_name(parameters),
        schedule: parameters.required_text("Schedule")?.to_string(),
    }))
}

fn bucket_event(_: &Origin, parameters: &Parameters) -> Result<RecordKind, AnnotationError> {
    Ok(RecordKind::Event(EventSource::Bucket {
        name: event_name(parameters),
        bucket: parameters.required_value("Bucket")?.clone(),
        events: parameters.required_text("Event")?.to_string(),
    }))
}
