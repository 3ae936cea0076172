//! Annotation records
//!
//! One [`AnnotationRecord`] per capability instance on a class. The record
//! kind is a closed enum; whether a record defines a resource or decorates
//! one is a property of its kind ([`RecordKind::role`]).

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use stratus_template::{Mapping, Value};

/// Identity of the annotated class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Project directory the class belongs to
    pub project: PathBuf,
    /// Source file declaring the class
    pub file: PathBuf,
    /// Class name
    pub declaration: String,
}

impl Origin {
    /// Create origin
    #[inline]
    #[must_use]
    pub fn new(
        project: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
        declaration: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            file: file.into(),
            declaration: declaration.into(),
        }
    }
}

/// How a record contributes to its class's resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRole {
    /// Defines the resource
    Resource,
    /// Entry in `Environment.Variables`
    Environment,
    /// Entry in `Tags`
    Tag,
    /// Entry in `Events`
    EventSource,
    /// Singleton property set directly on the resource
    Property,
}

/// `Tracing` property values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TracingMode {
    /// X-Ray active tracing
    Active,
    /// Pass through upstream decisions
    PassThrough,
}

impl TracingMode {
    /// Template spelling
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::PassThrough => "PassThrough",
        }
    }
}

impl FromStr for TracingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "PassThrough" => Ok(Self::PassThrough),
            _ => Err(()),
        }
    }
}

impl Display for TracingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP methods accepted by an API event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// Any method
    #[default]
    Any,
}

impl HttpMethod {
    /// Template spelling (lower-case)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Any => "any",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "head" => Ok(Self::Head),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "options" => Ok(Self::Options),
            "any" => Ok(Self::Any),
            _ => Err(()),
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API Gateway event source
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEvent {
    /// Event name; defaults to `<Class>API`
    pub name: Option<String>,
    /// Resource path, e.g. `/items/{id}`
    pub path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Authorizer name
    pub authorizer: Option<String>,
    /// Explicit API to attach to
    pub rest_api_id: Option<Value>,
}

/// Event source attached to a function
#[derive(Debug, Clone, PartialEq)]
pub enum EventSource {
    /// HTTP route (`Type: Api`)
    Api(ApiEvent),
    /// SNS subscription (`Type: SNS`)
    Topic {
        /// Event name; defaults to `<Class>Topic`
        name: Option<String>,
        /// Topic ARN or reference
        topic: Value,
    },
    /// Scheduled invocation (`Type: Schedule`)
    Schedule {
        /// Event name; defaults to `<Class>Schedule`
        name: Option<String>,
        /// `rate(...)` or `cron(...)` expression
        schedule: String,
    },
    /// S3 bucket notification (`Type: S3`)
    Bucket {
        /// Event name; defaults to `<Class>Bucket`
        name: Option<String>,
        /// Bucket reference
        bucket: Value,
        /// S3 event type, e.g. `s3:ObjectCreated:*`
        events: String,
    },
}

impl EventSource {
    /// Explicit event name, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.name.as_deref(),
            Self::Topic { name, .. } | Self::Schedule { name, .. } | Self::Bucket { name, .. } => {
                name.as_deref()
            }
        }
        .filter(|name| !name.is_empty())
    }

    /// SAM event `Type`
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Api(_) => "Api",
            Self::Topic { .. } => "SNS",
            Self::Schedule { .. } => "Schedule",
            Self::Bucket { .. } => "S3",
        }
    }

    /// Key under `Events`, falling back to a name derived from the class
    #[must_use]
    pub fn event_name(&self, declaration: &str) -> String {
        if let Some(name) = self.name() {
            return name.to_string();
        }
        let suffix = match self {
            Self::Api(_) => "API",
            Self::Topic { .. } => "Topic",
            Self::Schedule { .. } => "Schedule",
            Self::Bucket { .. } => "Bucket",
        };
        format!("{declaration}{suffix}")
    }

    /// `{ Type, Properties }` entry
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut properties = Mapping::new();
        match self {
            Self::Api(api) => {
                properties.insert("Path".to_string(), Value::from(api.path.as_str()));
                properties.insert("Method".to_string(), Value::from(api.method.as_str()));
                if let Some(authorizer) = &api.authorizer {
                    let mut auth = Mapping::new();
                    auth.insert("Authorizer".to_string(), Value::from(authorizer.as_str()));
                    properties.insert("Auth".to_string(), Value::Mapping(auth));
                }
                if let Some(rest_api_id) = &api.rest_api_id {
                    properties.insert("RestApiId".to_string(), rest_api_id.clone());
                }
            }
            Self::Topic { topic, .. } => {
                properties.insert("Topic".to_string(), topic.clone());
            }
            Self::Schedule { schedule, .. } => {
                properties.insert("Schedule".to_string(), Value::from(schedule.as_str()));
            }
            Self::Bucket { bucket, events, .. } => {
                properties.insert("Bucket".to_string(), bucket.clone());
                properties.insert("Events".to_string(), Value::from(events.as_str()));
            }
        }

        let mut entry = Mapping::new();
        entry.insert("Type".to_string(), Value::from(self.event_type()));
        entry.insert("Properties".to_string(), Value::Mapping(properties));
        Value::Mapping(entry)
    }
}

/// Capability-specific record content
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    /// Serverless function resource
    Function {
        /// Logical resource name
        name: String,
    },
    /// `Runtime`
    Runtime(String),
    /// `MemorySize` in MB
    MemorySize(u32),
    /// `Timeout` in seconds
    Timeout(u32),
    /// `Role`
    Role(Value),
    /// `Tracing`
    Tracing(TracingMode),
    /// Environment variable
    Environment {
        /// Variable name
        key: String,
        /// Variable value
        value: Value,
    },
    /// Resource tag
    Tag {
        /// Tag key
        key: String,
        /// Tag value
        value: String,
    },
    /// Event source
    Event(EventSource),
}

impl RecordKind {
    /// Role of this record in resource assembly
    #[must_use]
    pub fn role(&self) -> RecordRole {
        match self {
            Self::Function { .. } => RecordRole::Resource,
            Self::Environment { .. } => RecordRole::Environment,
            Self::Tag { .. } => RecordRole::Tag,
            Self::Event(_) => RecordRole::EventSource,
            Self::Runtime(_)
            | Self::MemorySize(_)
            | Self::Timeout(_)
            | Self::Role(_)
            | Self::Tracing(_) => RecordRole::Property,
        }
    }

    /// Property name and value for singleton property records
    #[must_use]
    pub fn property(&self) -> Option<(&'static str, Value)> {
        match self {
            Self::Runtime(runtime) => Some(("Runtime", Value::from(runtime.as_str()))),
            Self::MemorySize(size) => Some(("MemorySize", Value::from(*size))),
            Self::Timeout(seconds) => Some(("Timeout", Value::from(*seconds))),
            Self::Role(role) => Some(("Role", role.clone())),
            Self::Tracing(mode) => Some(("Tracing", Value::from(mode.as_str()))),
            _ => None,
        }
    }
}

/// One capability instance on one class
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    /// Annotated class
    pub origin: Origin,
    /// Capability-specific content
    pub kind: RecordKind,
}

impl AnnotationRecord {
    /// Create record
    #[inline]
    #[must_use]
    pub fn new(origin: Origin, kind: RecordKind) -> Self {
        Self { origin, kind }
    }

    /// Role of this record
    #[inline]
    #[must_use]
    pub fn role(&self) -> RecordRole {
        self.kind.role()
    }
}
