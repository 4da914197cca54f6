//! Package file resolution
//!
//! Derives the base file set of a package from the manifest: one member per
//! non-empty executable and icon path across all application entries, in
//! manifest order, with the manifest itself appended last. Every referenced
//! file must exist in the project tree; resolution never silently skips a
//! declared artifact.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::files::{DiskFile, ManifestFile, PackageFile};
use crate::manifest::{Application, TizenManifest};

/// Package subtree holding executables
pub const BIN_DIR: &str = "bin";

/// Package subtree holding icons and other shared resources
pub const SHARED_DIR: &str = "shared";

/// Errors from file resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("missing artifact {path} (declared by application {app_id})")]
    MissingArtifact { path: String, app_id: String },

    #[error("duplicate package path {path}")]
    DuplicatePath { path: String },
}

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolve the ordered base file list for a manifest. `project_root` is the
/// directory package-relative paths are resolved against.
pub fn resolve_files(
    manifest: &TizenManifest,
    project_root: &Path,
) -> ResolveResult<Vec<PackageFile>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for app in manifest
        .ui_applications
        .iter()
        .chain(manifest.service_applications.iter())
    {
        resolve_application(app, project_root, &mut files, &mut seen)?;
    }

    files.push(PackageFile::Manifest(ManifestFile::new(manifest.clone())));
    Ok(files)
}

fn resolve_application(
    app: &Application,
    project_root: &Path,
    files: &mut Vec<PackageFile>,
    seen: &mut HashSet<String>,
) -> ResolveResult<()> {
    if !app.exec.is_empty() {
        let package_path = format!("{BIN_DIR}/{}", app.exec);
        files.push(disk_file(project_root, package_path, app, seen)?);
    }
    if !app.icon.is_empty() {
        let package_path = format!("{SHARED_DIR}/{}", app.icon);
        files.push(disk_file(project_root, package_path, app, seen)?);
    }
    Ok(())
}

fn disk_file(
    project_root: &Path,
    package_path: String,
    app: &Application,
    seen: &mut HashSet<String>,
) -> ResolveResult<PackageFile> {
    if !seen.insert(package_path.clone()) {
        return Err(ResolveError::DuplicatePath { path: package_path });
    }
    let source = project_root.join(&package_path);
    let file = DiskFile::new(source, package_path.clone()).map_err(|_| {
        ResolveError::MissingArtifact {
            path: package_path,
            app_id: app.app_id.clone(),
        }
    })?;
    Ok(PackageFile::Disk(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_PATH;
    use std::fs;
    use tempfile::TempDir;

    fn project_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for path in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, format!("content of {path}")).unwrap();
        }
        dir
    }

    fn manifest_with_ui_app(exec: &str, icon: &str) -> TizenManifest {
        let mut manifest = TizenManifest::new("demo");
        manifest.service_applications.clear();
        manifest.ui_applications.push(Application {
            app_id: "org.tizen.demo.ui".to_string(),
            exec: exec.to_string(),
            app_type: "capp".to_string(),
            launch_mode: String::new(),
            multiple: false,
            no_display: false,
            task_manage: true,
            icon: icon.to_string(),
        });
        manifest
    }

    #[test]
    fn resolves_exec_icon_then_manifest() {
        let dir = project_with(&["bin/demo", "shared/demo.png"]);
        let manifest = manifest_with_ui_app("demo", "demo.png");

        let files = resolve_files(&manifest, dir.path()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.package_path()).collect();
        assert_eq!(paths, vec!["bin/demo", "shared/demo.png", MANIFEST_PATH]);
    }

    #[test]
    fn preserves_manifest_entry_order() {
        let dir = project_with(&["bin/ui", "bin/svc"]);
        let mut manifest = manifest_with_ui_app("ui", "");
        manifest.service_applications.push(Application {
            app_id: "org.tizen.demo.svc".to_string(),
            exec: "svc".to_string(),
            app_type: "capp".to_string(),
            launch_mode: String::new(),
            multiple: false,
            no_display: false,
            task_manage: false,
            icon: String::new(),
        });

        let files = resolve_files(&manifest, dir.path()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.package_path()).collect();
        assert_eq!(paths, vec!["bin/ui", "bin/svc", MANIFEST_PATH]);
    }

    #[test]
    fn empty_paths_contribute_nothing() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with_ui_app("", "");

        let files = resolve_files(&manifest, dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].package_path(), MANIFEST_PATH);
    }

    #[test]
    fn missing_exec_names_path_and_entry() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with_ui_app("missing", "");

        let err = resolve_files(&manifest, dir.path()).unwrap_err();
        match err {
            ResolveError::MissingArtifact { path, app_id } => {
                assert_eq!(path, "bin/missing");
                assert_eq!(app_id, "org.tizen.demo.ui");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_package_path_is_fatal() {
        let dir = project_with(&["bin/demo"]);
        let mut manifest = manifest_with_ui_app("demo", "");
        manifest.service_applications.push(Application {
            app_id: "org.tizen.demo.svc".to_string(),
            exec: "demo".to_string(),
            app_type: "capp".to_string(),
            launch_mode: String::new(),
            multiple: false,
            no_display: false,
            task_manage: false,
            icon: String::new(),
        });

        let err = resolve_files(&manifest, dir.path()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicatePath { path } if path == "bin/demo"));
    }
}
