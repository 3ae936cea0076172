//! Stratus Template Layer
//!
//! The boundary between the persisted SAM template (`template.yaml`) and the
//! in-memory document the synthesis engine merges into.
//!
//! # Core Operations
//!
//! - **Decode**: YAML text → [`TemplateDocument`], resolving `!Ref`,
//!   `!GetAtt` and `!Sub` scalars into [`TagReference`] values
//! - **Merge**: fold resource entries into the `Resources` mapping
//! - **Encode**: [`TemplateDocument`] → YAML text, re-emitting the same tags
//!
//! # Architecture
//!
//! ```text
//! template.yaml → DocumentStore::load ─┬→ template.yaml.bak
//!                                      └→ TemplateDocument → merge → DocumentStore::save → template.yaml
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stratus_template::{DocumentStore, TemplateDocument};
//!
//! # fn example() -> Result<(), stratus_template::TemplateError> {
//! let store = DocumentStore::new("template.yaml");
//! let document: TemplateDocument = store.load()?;
//! // ... merge resources ...
//! store.save(&document)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod codec;
pub mod document;
pub mod error;
pub mod store;
pub mod value;

// Re-exports for convenience
pub use codec::TagCodec;
pub use document::{MergeReport, TemplateDocument, TemplateResource, RESOURCES_KEY};
pub use error::{TagError, TemplateError};
pub use store::{DocumentStore, DEFAULT_BACKUP_SUFFIX};
pub use value::{Mapping, TagReference, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with templates
    pub use crate::codec::TagCodec;
    pub use crate::document::{TemplateDocument, TemplateResource};
    pub use crate::error::{TagError, TemplateError};
    pub use crate::store::DocumentStore;
    pub use crate::value::{Mapping, TagReference, Value};
}
