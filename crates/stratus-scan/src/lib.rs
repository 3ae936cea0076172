//! Stratus Scan
//!
//! Finds the capability interfaces implemented by exported TypeScript
//! classes.
//!
//! # Overview
//!
//! - **ParsedSource**: source text plus its tree-sitter syntax tree
//! - **DeclarationWalker**: lazy traversal yielding [`CapabilityBinding`]s
//!
//! Type arguments are returned as raw source text; turning them into typed
//! records is left to `stratus-annotations`.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod source;
pub mod walker;

// Re-exports
pub use error::ScanError;
pub use source::{is_declaration_file, ParsedSource, SourceDialect};
pub use walker::{CapabilityBinding, CapabilityBindings, DeclarationWalker};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scanning sources
    pub use crate::{CapabilityBinding, DeclarationWalker, ParsedSource, ScanError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
