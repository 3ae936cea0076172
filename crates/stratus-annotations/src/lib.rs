//! Stratus Annotations
//!
//! Turns capability declarations found on application classes into SAM
//! resource descriptors.
//!
//! # Overview
//!
//! - **CapabilityRegistry**: capability name → slots + record constructor
//! - **AnnotationExtractor**: raw slot text → typed [`AnnotationRecord`]
//! - **ResourceAssembler**: one class's records → [`ResourceDescriptor`]
//!
//! # Example
//!
//! ```rust
//! use stratus_annotations::{AnnotationExtractor, CapabilityRegistry, RawParameters, ResourceAssembler};
//!
//! let registry = CapabilityRegistry::standard();
//! let extractor = AnnotationExtractor::new(&registry, "/work/items", "/work/items/src/items.ts");
//!
//! let mut name = RawParameters::new();
//! name.insert("Name".into(), "'ItemsFunction'".into());
//! let mut route = RawParameters::new();
//! route.insert("Path".into(), "'/items'".into());
//! route.insert("Method".into(), "'get'".into());
//!
//! let records: Vec<_> = [("LambdaResource", name), ("APIGatewayEventSource", route)]
//!     .iter()
//!     .filter_map(|(capability, raw)| extractor.extract("Items", capability, raw).unwrap())
//!     .collect();
//!
//! let descriptor = ResourceAssembler::new().assemble("Items", &records).unwrap();
//! assert_eq!(descriptor.name, "ItemsFunction");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod assembler;
pub mod capabilities;
pub mod descriptor;
pub mod error;
pub mod extractor;
pub mod record;
pub mod registry;

// Re-exports
pub use assembler::{ResourceAssembler, DEFAULT_HANDLERS_DIR, DEFAULT_RUNTIME};
pub use descriptor::{handler_module_name, ResourceDescriptor, ResourceKind};
pub use error::AnnotationError;
pub use extractor::{normalize_literal, AnnotationExtractor, RawParameters};
pub use record::{
    AnnotationRecord, ApiEvent, EventSource, HttpMethod, Origin, RecordKind, RecordRole,
    TracingMode,
};
pub use registry::{CapabilityRegistry, CapabilitySpec, Parameters, RecordConstructor, Slot};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for annotation processing
    pub use crate::{
        AnnotationError, AnnotationExtractor, AnnotationRecord, CapabilityRegistry, Origin,
        RawParameters, RecordKind, ResourceAssembler, ResourceDescriptor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
