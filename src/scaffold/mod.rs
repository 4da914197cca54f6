//! Project scaffolding
//!
//! `init` writes a default manifest into an empty project tree. A tree that
//! already carries a manifest is left untouched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::context::Context;
use crate::manifest::{ManifestError, TizenManifest, MANIFEST_PATH};

/// Errors from project scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("manifest already exists in {root}, refusing to init")]
    AlreadyInitialized { root: PathBuf },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to create project file: {0}")]
    Io(#[from] io::Error),
}

/// Initialize an empty project, returning the package-relative paths of the
/// files created.
pub fn init_project(context: &Context) -> Result<Vec<String>, ScaffoldError> {
    if context.manifest.is_some() {
        return Err(ScaffoldError::AlreadyInitialized {
            root: context.project_root.clone(),
        });
    }

    let name = context
        .project_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());

    let manifest = TizenManifest::new(&name);
    manifest.save(&context.project_root.join(MANIFEST_PATH))?;

    Ok(vec![MANIFEST_PATH.to_string()])
}
