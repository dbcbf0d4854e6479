//! File-backed command providers.
//!
//! An extension that ships a declarative command file gets a
//! [`FileProvider`] registered for it. The file is YAML, a mapping of
//! command name to descriptor fields; parsing goes through the lenient
//! ingestion boundary in `cmdcat-core`, so a malformed field degrades
//! to absent instead of failing the extension.

use cmdcat_core::{
    ingest_commands, CommandDescriptor, CommandProvider, Extension, ProviderError,
    ProviderRegistry,
};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Primary command file name inside an extension directory.
pub const COMMANDS_FILE: &str = "commands.yml";

/// Subdirectory checked for the secondary command file location.
pub const COMMANDS_DIR: &str = "commands";

/// A command provider backed by a declarative YAML file.
#[derive(Debug)]
pub struct FileProvider {
    extension: String,
    path: PathBuf,
}

impl FileProvider {
    /// Locate the command file for an extension, if one exists.
    ///
    /// Checks the primary path `<ext>/commands.yml`, then the secondary
    /// path `<ext>/commands/<id>.yml`. An extension with neither file
    /// has no registration capability.
    pub fn locate(root: &Path, extension: &str) -> Option<Self> {
        let ext_dir = root.join(extension);

        let primary = ext_dir.join(COMMANDS_FILE);
        let secondary = ext_dir.join(COMMANDS_DIR).join(format!("{extension}.yml"));

        let path = [primary, secondary].into_iter().find(|p| p.is_file())?;

        debug!(extension, path = %path.display(), "located command file");
        Some(Self {
            extension: extension.to_string(),
            path,
        })
    }

    /// The command file backing this provider.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandProvider for FileProvider {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn commands(&self) -> Result<IndexMap<String, CommandDescriptor>, ProviderError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.clone(),
            source,
        })?;

        // Deserialize through serde_json::Value: insertion order is
        // preserved and ingestion tolerates loose field shapes.
        let value: serde_json::Value =
            serde_yml::from_str(&text).map_err(|e| ProviderError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        ingest_commands(&value).ok_or(ProviderError::NotAMapping)
    }
}

/// Register a [`FileProvider`] for every extension that ships a
/// command file and has no provider registered yet.
///
/// Explicit registrations made before this call take precedence.
pub fn discover_file_providers(
    registry: &mut ProviderRegistry,
    root: &Path,
    extensions: &[Extension],
) {
    for extension in extensions {
        if let Some(provider) = FileProvider::locate(root, &extension.id) {
            registry.register(Box::new(provider));
        }
    }
}
