//! Package file model
//!
//! Everything that ends up inside the archive is a [`PackageFile`]: the
//! serialized manifest, a file read from the project tree, or a signed
//! signature artifact. Each variant knows its package-relative path and can
//! produce its byte content on demand; content is never cached across reads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::{ManifestError, TizenManifest, MANIFEST_PATH};
use crate::signature::SignatureRole;

/// Errors from package file content production
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{path} does not exist or is not a regular file")]
    NotRegular { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Result type for package file operations
pub type FileResult<T> = Result<T, FileError>;

/// A file destined for the package archive
#[derive(Debug, Clone)]
pub enum PackageFile {
    /// The manifest itself, serialized on demand
    Manifest(ManifestFile),
    /// A regular file from the project tree
    Disk(DiskFile),
    /// A signed signature document
    Signature(SignatureFile),
}

impl PackageFile {
    /// Path relative to the package root
    pub fn package_path(&self) -> &str {
        match self {
            PackageFile::Manifest(_) => MANIFEST_PATH,
            PackageFile::Disk(file) => &file.package_path,
            PackageFile::Signature(file) => file.role.package_path(),
        }
    }

    /// Produce the full byte content of this file
    pub fn content(&self) -> FileResult<Vec<u8>> {
        match self {
            PackageFile::Manifest(file) => Ok(file.manifest.to_xml()?.into_bytes()),
            PackageFile::Disk(file) => file.read(),
            PackageFile::Signature(file) => Ok(file.content.clone()),
        }
    }
}

/// The manifest as a package member (`tizen-manifest.xml`)
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub manifest: TizenManifest,
}

impl ManifestFile {
    pub fn new(manifest: TizenManifest) -> Self {
        Self { manifest }
    }
}

/// A package member backed by a file in the project tree
#[derive(Debug, Clone)]
pub struct DiskFile {
    /// Absolute path of the backing file
    source: PathBuf,
    /// Path the file takes inside the package
    package_path: String,
}

impl DiskFile {
    /// Create a disk file entry. The backing file must exist and be a
    /// regular file at construction time.
    pub fn new(source: PathBuf, package_path: String) -> FileResult<Self> {
        check_regular(&source)?;
        Ok(Self {
            source,
            package_path,
        })
    }

    /// Read the full backing file. Existence is re-checked since the file
    /// may have vanished between resolution and content production.
    fn read(&self) -> FileResult<Vec<u8>> {
        check_regular(&self.source)?;
        fs::read(&self.source).map_err(|source| FileError::Read {
            path: self.source.clone(),
            source,
        })
    }
}

/// A signed signature document produced by the external signer
#[derive(Debug, Clone)]
pub struct SignatureFile {
    pub role: SignatureRole,
    pub content: Vec<u8>,
}

impl SignatureFile {
    pub fn new(role: SignatureRole, content: Vec<u8>) -> Self {
        Self { role, content }
    }
}

fn check_regular(path: &Path) -> FileResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(FileError::NotRegular {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disk_file_produces_content() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app");
        fs::write(&source, b"binary payload").unwrap();

        let file = PackageFile::Disk(DiskFile::new(source, "bin/app".to_string()).unwrap());
        assert_eq!(file.package_path(), "bin/app");
        assert_eq!(file.content().unwrap(), b"binary payload");
    }

    #[test]
    fn disk_file_rejects_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = DiskFile::new(dir.path().join("gone"), "bin/gone".to_string()).unwrap_err();
        assert!(matches!(err, FileError::NotRegular { .. }));
    }

    #[test]
    fn disk_file_rejects_directory_source() {
        let dir = TempDir::new().unwrap();
        let err = DiskFile::new(dir.path().to_path_buf(), "bin/dir".to_string()).unwrap_err();
        assert!(matches!(err, FileError::NotRegular { .. }));
    }

    #[test]
    fn manifest_file_serializes_manifest() {
        let file = PackageFile::Manifest(ManifestFile::new(TizenManifest::new("demo")));
        assert_eq!(file.package_path(), MANIFEST_PATH);
        let content = String::from_utf8(file.content().unwrap()).unwrap();
        assert!(content.contains("org.tizen.demo"));
    }

    #[test]
    fn signature_file_returns_signed_bytes() {
        let file = PackageFile::Signature(SignatureFile::new(
            SignatureRole::Author,
            b"<Signature/>".to_vec(),
        ));
        assert_eq!(file.package_path(), "author-signature.xml");
        assert_eq!(file.content().unwrap(), b"<Signature/>");
    }
}
