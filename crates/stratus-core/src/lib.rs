//! Stratus Core
//!
//! Orchestrates a synthesis run over a directory of TypeScript projects.
//!
//! # Overview
//!
//! - **SynthesisConfig**: paths, globs and defaults for a run
//! - **ProjectDiscovery**: opted-in projects below a root
//! - **HandlerEmitter**: invocation stubs for function resources
//! - **SynthesisDriver**: load → scan → assemble → emit → merge → save
//!
//! # Example
//!
//! ```rust,no_run
//! use stratus_core::{SynthesisConfig, SynthesisDriver};
//!
//! # fn example() -> Result<(), stratus_core::SynthesisError> {
//! let config = SynthesisConfig::new().with_project_root("services/shop");
//! let report = SynthesisDriver::new(config).run()?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod driver;
pub mod error;
pub mod handler;
pub mod project;

// Re-exports
pub use config::SynthesisConfig;
pub use driver::{MergedResource, SynthesisDriver, SynthesisReport};
pub use error::{ProjectSkip, SynthesisError};
pub use handler::HandlerEmitter;
pub use project::{PackageManifest, Project, ProjectDiscovery, TsConfig};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running synthesis
    pub use crate::{SynthesisConfig, SynthesisDriver, SynthesisError, SynthesisReport};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
