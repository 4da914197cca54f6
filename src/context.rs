//! Project context discovery
//!
//! A context pins the absolute project root and the manifest loaded from its
//! canonical location. Commands that require a manifest (`package`) fail on a
//! missing one; commands that require its absence (`init`) check the other way.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::{ManifestError, TizenManifest, MANIFEST_PATH};

/// Errors from context discovery
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("unable to resolve project root {path}: {source}")]
    Root { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Basic information about the project being built
#[derive(Debug, Clone)]
pub struct Context {
    /// Absolute path to the project root directory
    pub project_root: PathBuf,

    /// Manifest loaded from `tizen-manifest.xml`, if one exists
    pub manifest: Option<TizenManifest>,
}

impl Context {
    /// Build a context for the given project directory. The manifest is
    /// loaded when present; a malformed manifest is an error, a missing one
    /// is not.
    pub fn discover(project_dir: &Path) -> Result<Self, ContextError> {
        let project_root = project_dir
            .canonicalize()
            .map_err(|source| ContextError::Root {
                path: project_dir.to_path_buf(),
                source,
            })?;

        let manifest_path = project_root.join(MANIFEST_PATH);
        let manifest = if manifest_path.is_file() {
            Some(TizenManifest::load(&manifest_path)?)
        } else {
            None
        };

        Ok(Self {
            project_root,
            manifest,
        })
    }
}
