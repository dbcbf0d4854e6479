//! The catalog builder and its collaborator interfaces.
//!
//! [`build_catalog`] is one linear pass over the installed extensions.
//! Each extension either contributes a [`CatalogSection`] or is skipped;
//! nothing that goes wrong with a single extension aborts the build.
//! Failures are accumulated as [`BuildWarning`]s in the returned
//! [`Catalog`], alongside the sections.
//!
//! Commands are obtained through the [`CommandProvider`] capability.
//! Providers are registered explicitly (typed, at load time) in a
//! [`ProviderRegistry`] rather than being located by naming convention
//! at call time.

use crate::descriptor::CommandDescriptor;
use crate::row::CommandRow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// An extension's manifest data.
///
/// Only `name` is required; the rest is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Human-readable display name, used as the section title.
    pub name: String,
    /// Extension version, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Short description of the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Manifest {
    /// A manifest carrying only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
        }
    }
}

/// Why an extension's manifest could not be resolved.
#[derive(Debug, Clone, Error)]
pub enum ManifestIssue {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Unreadable(String),
    /// The manifest file did not parse into valid manifest data.
    /// Covers a missing `name` field.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// One installed extension, as handed to the builder.
///
/// The loader resolves the manifest up front; a failed resolution is
/// carried here so the builder can report it without doing I/O itself.
#[derive(Debug)]
pub struct Extension {
    /// Unique extension identifier (its directory name).
    pub id: String,
    /// The resolved manifest, or the reason it could not be resolved.
    pub manifest: Result<Manifest, ManifestIssue>,
}

impl Extension {
    /// An extension with a successfully resolved manifest.
    pub fn new(id: impl Into<String>, manifest: Manifest) -> Self {
        Self {
            id: id.into(),
            manifest: Ok(manifest),
        }
    }

    /// An extension whose manifest could not be resolved.
    pub fn broken(id: impl Into<String>, issue: ManifestIssue) -> Self {
        Self {
            id: id.into(),
            manifest: Err(issue),
        }
    }
}

/// Errors a command provider can produce.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A registration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A registration file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// The file with the parse failure.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// The registration produced something other than a mapping of
    /// command name to descriptor.
    #[error("command registration did not produce a mapping")]
    NotAMapping,
}

/// The capability an extension implements to register commands.
///
/// Implementations must be side-effect free per build: the builder may
/// be invoked repeatedly and expects identical answers for identical
/// inputs.
pub trait CommandProvider {
    /// Identifier of the extension this provider registers commands for.
    fn extension(&self) -> &str;

    /// The registered commands, in registration order.
    fn commands(&self) -> Result<IndexMap<String, CommandDescriptor>, ProviderError>;
}

/// Resolves an extension id to its command provider, if any.
pub trait ProviderLookup {
    /// The provider registered for `extension`, or `None`.
    fn provider_for(&self, extension: &str) -> Option<&dyn CommandProvider>;
}

/// Registry of command providers, keyed by extension id.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn CommandProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider.
    ///
    /// The first registration for an extension id wins; later ones for
    /// the same id are ignored. This lets explicit registrations take
    /// precedence over filesystem discovery.
    pub fn register(&mut self, provider: Box<dyn CommandProvider>) {
        if self.provider_for(provider.extension()).is_some() {
            debug!(
                extension = provider.extension(),
                "provider already registered, ignoring"
            );
            return;
        }
        self.providers.push(provider);
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderLookup for ProviderRegistry {
    fn provider_for(&self, extension: &str) -> Option<&dyn CommandProvider> {
        self.providers
            .iter()
            .find(|p| p.extension() == extension)
            .map(AsRef::as_ref)
    }
}

/// A non-fatal problem encountered while building the catalog.
#[derive(Debug, Error)]
pub enum BuildWarning {
    /// The extension's manifest could not be resolved.
    #[error("extension {extension}: {issue}")]
    Manifest {
        /// The affected extension id.
        extension: String,
        /// What went wrong with the manifest.
        issue: ManifestIssue,
    },

    /// The extension's provider failed to produce commands.
    #[error("extension {extension}: {source}")]
    Provider {
        /// The affected extension id.
        extension: String,
        /// The provider failure.
        #[source]
        source: ProviderError,
    },
}

impl BuildWarning {
    /// The extension this warning is about.
    pub fn extension(&self) -> &str {
        match self {
            Self::Manifest { extension, .. } | Self::Provider { extension, .. } => extension,
        }
    }
}

/// One extension's contribution to the catalog: a title and its rows.
///
/// Sections are only created for extensions with at least one command;
/// `rows` is non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSection {
    /// The extension id the section came from.
    pub extension: String,
    /// Display title, taken from the manifest `name`.
    pub title: String,
    /// One row per registered command, in registration order.
    pub rows: Vec<CommandRow>,
}

/// The result of one catalog build.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Sections in the same relative order as the input extensions.
    pub sections: Vec<CatalogSection>,
    /// Non-fatal problems, one per skipped extension.
    pub warnings: Vec<BuildWarning>,
}

impl Catalog {
    /// Total number of command rows across all sections.
    pub fn command_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// Build the command catalog for a set of installed extensions.
///
/// Extensions are processed strictly in input order, sequentially:
/// provider implementations are independently authored and nothing
/// guarantees they tolerate concurrent invocation. Per extension:
///
/// 1. a manifest failure is recorded as a warning and the extension
///    is skipped;
/// 2. an extension without a provider is skipped silently;
/// 3. a provider failure is recorded as a warning and the extension
///    is skipped;
/// 4. an empty command mapping contributes no section;
/// 5. otherwise one [`CatalogSection`] is emitted, rows in the
///    mapping's insertion order.
pub fn build_catalog(extensions: &[Extension], providers: &dyn ProviderLookup) -> Catalog {
    let mut catalog = Catalog::default();

    for extension in extensions {
        let manifest = match &extension.manifest {
            Ok(manifest) => manifest,
            Err(issue) => {
                catalog.warnings.push(BuildWarning::Manifest {
                    extension: extension.id.clone(),
                    issue: issue.clone(),
                });
                continue;
            }
        };

        let Some(provider) = providers.provider_for(&extension.id) else {
            debug!(extension = %extension.id, "no command provider, skipping");
            continue;
        };

        let commands = match provider.commands() {
            Ok(commands) => commands,
            Err(source) => {
                catalog.warnings.push(BuildWarning::Provider {
                    extension: extension.id.clone(),
                    source,
                });
                continue;
            }
        };

        if commands.is_empty() {
            debug!(extension = %extension.id, "provider registered no commands");
            continue;
        }

        let rows = commands
            .iter()
            .map(|(name, descriptor)| CommandRow::project(name, descriptor))
            .collect();

        catalog.sections.push(CatalogSection {
            extension: extension.id.clone(),
            title: manifest.name.clone(),
            rows,
        });
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticProvider {
        extension: String,
        commands: serde_json::Value,
    }

    impl StaticProvider {
        fn boxed(extension: &str, commands: serde_json::Value) -> Box<Self> {
            Box::new(Self {
                extension: extension.to_string(),
                commands,
            })
        }
    }

    impl CommandProvider for StaticProvider {
        fn extension(&self) -> &str {
            &self.extension
        }

        fn commands(&self) -> Result<IndexMap<String, CommandDescriptor>, ProviderError> {
            crate::descriptor::ingest_commands(&self.commands).ok_or(ProviderError::NotAMapping)
        }
    }

    fn extension(id: &str, title: &str) -> Extension {
        Extension::new(id, Manifest::named(title))
    }

    #[test]
    fn extension_without_provider_contributes_no_section() {
        let extensions = vec![extension("silent", "Silent")];
        let providers = ProviderRegistry::new();

        let catalog = build_catalog(&extensions, &providers);
        assert!(catalog.sections.is_empty());
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn single_command_yields_single_section() {
        let extensions = vec![extension("tools", "Tools")];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed(
            "tools",
            json!({"foo": {"description": "Foos"}}),
        ));

        let catalog = build_catalog(&extensions, &providers);
        assert_eq!(catalog.sections.len(), 1);

        let section = &catalog.sections[0];
        assert_eq!(section.title, "Tools");
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].name, "foo");
    }

    #[test]
    fn manifest_failure_warns_and_skips() {
        let extensions = vec![Extension::broken(
            "broken-ext",
            ManifestIssue::Unreadable("no such file".to_string()),
        )];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed("broken-ext", json!({"cmd": {}})));

        let catalog = build_catalog(&extensions, &providers);
        assert!(catalog.sections.is_empty());
        assert_eq!(catalog.warnings.len(), 1);
        assert_eq!(catalog.warnings[0].extension(), "broken-ext");
        assert!(catalog.warnings[0].to_string().contains("broken-ext"));
    }

    #[test]
    fn non_mapping_registration_warns_and_skips() {
        let extensions = vec![extension("odd", "Odd"), extension("fine", "Fine")];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed("odd", json!(["not", "a", "mapping"])));
        providers.register(StaticProvider::boxed("fine", json!({"ok": {}})));

        let catalog = build_catalog(&extensions, &providers);
        assert_eq!(catalog.sections.len(), 1);
        assert_eq!(catalog.sections[0].extension, "fine");
        assert_eq!(catalog.warnings.len(), 1);
        assert!(matches!(
            catalog.warnings[0],
            BuildWarning::Provider {
                source: ProviderError::NotAMapping,
                ..
            }
        ));
    }

    #[test]
    fn empty_command_mapping_contributes_no_section() {
        let extensions = vec![extension("hollow", "Hollow")];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed("hollow", json!({})));

        let catalog = build_catalog(&extensions, &providers);
        assert!(catalog.sections.is_empty());
        assert!(catalog.warnings.is_empty());
    }

    #[test]
    fn sections_preserve_extension_order() {
        let extensions = vec![
            extension("zulu", "Zulu"),
            extension("alpha", "Alpha"),
            extension("mike", "Mike"),
        ];
        let mut providers = ProviderRegistry::new();
        for id in ["zulu", "alpha", "mike"] {
            providers.register(StaticProvider::boxed(id, json!({"go": {}})));
        }

        let catalog = build_catalog(&extensions, &providers);
        let order: Vec<&str> = catalog
            .sections
            .iter()
            .map(|s| s.extension.as_str())
            .collect();
        assert_eq!(order, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn rows_preserve_registration_order() {
        let extensions = vec![extension("tools", "Tools")];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed(
            "tools",
            json!({"zeta": {}, "alpha": {}, "beta": {}}),
        ));

        let catalog = build_catalog(&extensions, &providers);
        let names: Vec<&str> = catalog.sections[0]
            .rows
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn build_is_idempotent() {
        let extensions = vec![extension("tools", "Tools"), extension("other", "Other")];
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed(
            "tools",
            json!({"foo": {"aliases": ["f"]}, "bar": {}}),
        ));

        let first = build_catalog(&extensions, &providers);
        let second = build_catalog(&extensions, &providers);
        assert_eq!(first.sections, second.sections);
        assert_eq!(first.warnings.len(), second.warnings.len());
    }

    #[test]
    fn first_registration_wins() {
        let mut providers = ProviderRegistry::new();
        providers.register(StaticProvider::boxed("tools", json!({"first": {}})));
        providers.register(StaticProvider::boxed("tools", json!({"second": {}})));

        assert_eq!(providers.len(), 1);
        let commands = providers
            .provider_for("tools")
            .expect("provider registered")
            .commands()
            .expect("mapping");
        assert!(commands.contains_key("first"));
    }
}
