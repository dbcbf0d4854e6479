//! Core types for cmdcat
//!
//! This crate provides the fundamental types used throughout the cmdcat project:
//!
//! - [`CommandDescriptor`] - Metadata registered for a single command
//! - [`OptionHelp`] - Help text for a command option (plain or a list of choices)
//! - [`CommandRow`] - The fixed seven-column projection of one command
//! - [`CatalogSection`] - All rows contributed by one extension
//! - [`Catalog`] - The full build result, sections plus non-fatal warnings
//! - [`CommandProvider`] - The capability an extension implements to register commands
//! - [`build_catalog`] - One linear pass turning extensions into a catalog
//!
//! The crate is purely computational: reading manifests and locating
//! command registrations on disk belong to `cmdcat-loader`.
//!
//! # Example
//!
//! ```
//! use cmdcat_core::{build_catalog, Extension, Manifest, ProviderRegistry};
//!
//! let extensions = vec![Extension::new("backup", Manifest::named("Backup Tools"))];
//! let providers = ProviderRegistry::new();
//!
//! // No provider registered for "backup", so the catalog is empty.
//! let catalog = build_catalog(&extensions, &providers);
//! assert!(catalog.sections.is_empty());
//! assert!(catalog.warnings.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod descriptor;
pub mod row;

pub use catalog::{
    build_catalog, BuildWarning, Catalog, CatalogSection, CommandProvider, Extension, Manifest,
    ManifestIssue, ProviderError, ProviderLookup, ProviderRegistry,
};
pub use descriptor::{ingest_commands, CommandDescriptor, OptionHelp};
pub use row::CommandRow;
