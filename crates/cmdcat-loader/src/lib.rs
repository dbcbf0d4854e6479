//! Extension discovery for cmdcat.
//!
//! This crate owns all filesystem access: scanning the extensions
//! directory, reading each extension's `extension.yml` manifest, and
//! locating declarative command registration files. The catalog builder
//! in `cmdcat-core` stays free of I/O and consumes what is loaded here.
//!
//! # Layout convention
//!
//! Each immediate subdirectory of the extensions directory is one
//! extension; the directory name is its identifier. Inside it:
//!
//! ```text
//! <extensions-dir>/
//!   backup/
//!     extension.yml          # manifest (required)
//!     commands.yml           # command registration (primary path)
//!     commands/backup.yml    # command registration (secondary path)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cmdcat_core::{build_catalog, ProviderRegistry};
//! use cmdcat_loader::{discover_file_providers, scan_extensions};
//! use std::path::Path;
//!
//! let root = Path::new("extensions");
//! let extensions = scan_extensions(root)?;
//! let mut providers = ProviderRegistry::new();
//! discover_file_providers(&mut providers, root, &extensions);
//! let catalog = build_catalog(&extensions, &providers);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod provider;

pub use provider::{discover_file_providers, FileProvider, COMMANDS_DIR, COMMANDS_FILE};

use cmdcat_core::{Extension, Manifest, ManifestIssue};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Manifest filename inside each extension directory.
pub const MANIFEST_FILE: &str = "extension.yml";

/// Errors that abort an extension scan.
///
/// Only problems with the extensions directory itself are fatal;
/// per-extension manifest failures are carried inside the returned
/// [`Extension`] values.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The extensions directory could not be read.
    #[error("failed to read extensions directory {path}: {source}")]
    Io {
        /// The directory that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Scan an extensions directory and resolve each extension's manifest.
///
/// Extensions are returned sorted by identifier so the host-supplied
/// order is stable across platforms whose directory iteration order
/// differs. Non-directory entries are ignored.
pub fn scan_extensions(dir: &Path) -> Result<Vec<Extension>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut extensions = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "skipping non-UTF-8 directory name");
            continue;
        };

        debug!(extension = id, "found extension");
        extensions.push(Extension {
            id: id.to_string(),
            manifest: load_manifest(&path.join(MANIFEST_FILE)),
        });
    }

    extensions.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(extensions)
}

/// Read and parse one manifest file.
///
/// Failures are returned as data, not errors: the builder reports them
/// as per-extension warnings.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestIssue> {
    let text =
        fs::read_to_string(path).map_err(|e| ManifestIssue::Unreadable(e.to_string()))?;

    serde_yml::from_str(&text).map_err(|e| ManifestIssue::Invalid(e.to_string()))
}
