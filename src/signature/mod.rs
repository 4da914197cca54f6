//! Signature references and roles
//!
//! A package carries two chained XML digital signatures: the author signature
//! over the base file set, and the distributor signature over the base set
//! plus the author signature artifact. This module owns the reference model
//! (URI + base64 SHA-256 digest), the role/canonical-name mapping, the
//! unsigned document renderer, and the external signer adapter.

mod document;
mod signer;

pub use document::{render_unsigned, DocumentError};
pub use signer::{ExternalSigner, SignerError, SignerIdentity, SignerResult, Xmlsec1Signer};

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::files::{FileError, PackageFile};

/// Canonical archive member name of the author signature
pub const AUTHOR_SIGNATURE_PATH: &str = "author-signature.xml";

/// Canonical archive member name of the distributor signature
pub const DISTRIBUTOR_SIGNATURE_PATH: &str = "signature1.xml";

/// Which of the two signature passes a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRole {
    Author,
    Distributor,
}

impl SignatureRole {
    /// Package-relative path of the signed artifact
    pub fn package_path(&self) -> &'static str {
        match self {
            SignatureRole::Author => AUTHOR_SIGNATURE_PATH,
            SignatureRole::Distributor => DISTRIBUTOR_SIGNATURE_PATH,
        }
    }

    /// Signature element identifier inside the document
    pub fn element_id(&self) -> &'static str {
        match self {
            SignatureRole::Author => "AuthorSignature",
            SignatureRole::Distributor => "DistributorSignature",
        }
    }

    /// Role URI embedded in the signing-properties block
    pub fn role_uri(&self) -> &'static str {
        match self {
            SignatureRole::Author => "http://www.w3.org/ns/widgets-digsig#role-author",
            SignatureRole::Distributor => "http://www.w3.org/ns/widgets-digsig#role-distributor",
        }
    }
}

impl fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureRole::Author => f.write_str("author"),
            SignatureRole::Distributor => f.write_str("distributor"),
        }
    }
}

/// A (URI, digest) pair asserting the content that existed at a package path
/// when it was signed. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Package-relative path of the referenced file
    pub uri: String,
    /// Base64-encoded SHA-256 of the file content
    pub digest: String,
}

/// Errors from reference digest computation
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("digest computation failed for {path}: {source}")]
    Content { path: String, source: FileError },
}

/// Base64-encoded SHA-256 of a byte slice
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    BASE64.encode(hasher.finalize())
}

/// Compute the same-length ordered reference list for a file list. Each
/// file's content is read in full exactly once; any read failure aborts the
/// whole pass.
pub fn build_references(files: &[PackageFile]) -> Result<Vec<Reference>, DigestError> {
    let mut references = Vec::with_capacity(files.len());
    for file in files {
        let content = file.content().map_err(|source| DigestError::Content {
            path: file.package_path().to_string(),
            source,
        })?;
        references.push(Reference {
            uri: file.package_path().to_string(),
            digest: content_digest(&content),
        });
    }
    Ok(references)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{DiskFile, SignatureFile};
    use std::fs;
    use tempfile::TempDir;

    // SHA-256 of the empty string, base64-encoded
    const EMPTY_SHA256: &str = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

    #[test]
    fn digest_of_empty_content() {
        assert_eq!(content_digest(b""), EMPTY_SHA256);
    }

    #[test]
    fn digest_is_pure_function_of_content() {
        assert_eq!(content_digest(b"payload"), content_digest(b"payload"));
        assert_ne!(content_digest(b"payload"), content_digest(b"payloae"));
    }

    #[test]
    fn references_preserve_file_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), b"aaa").unwrap();
        fs::write(dir.path().join("b"), b"bbb").unwrap();

        let files = vec![
            PackageFile::Disk(DiskFile::new(dir.path().join("a"), "bin/a".to_string()).unwrap()),
            PackageFile::Disk(DiskFile::new(dir.path().join("b"), "bin/b".to_string()).unwrap()),
        ];

        let refs = build_references(&files).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].uri, "bin/a");
        assert_eq!(refs[1].uri, "bin/b");
        assert_eq!(refs[0].digest, content_digest(b"aaa"));
        assert_eq!(refs[1].digest, content_digest(b"bbb"));
    }

    #[test]
    fn changing_one_file_changes_only_its_digest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), b"stable").unwrap();
        fs::write(dir.path().join("b"), b"before").unwrap();

        let files = vec![
            PackageFile::Disk(DiskFile::new(dir.path().join("a"), "bin/a".to_string()).unwrap()),
            PackageFile::Disk(DiskFile::new(dir.path().join("b"), "bin/b".to_string()).unwrap()),
        ];

        let first = build_references(&files).unwrap();
        fs::write(dir.path().join("b"), b"after").unwrap();
        let second = build_references(&files).unwrap();

        assert_eq!(first[0], second[0]);
        assert_ne!(first[1].digest, second[1].digest);
    }

    #[test]
    fn vanished_file_aborts_the_pass() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), b"aaa").unwrap();
        let files = vec![PackageFile::Disk(
            DiskFile::new(dir.path().join("a"), "bin/a".to_string()).unwrap(),
        )];

        fs::remove_file(dir.path().join("a")).unwrap();
        let err = build_references(&files).unwrap_err();
        assert!(matches!(err, DigestError::Content { path, .. } if path == "bin/a"));
    }

    #[test]
    fn signature_files_are_digestable() {
        let files = vec![PackageFile::Signature(SignatureFile::new(
            SignatureRole::Author,
            Vec::new(),
        ))];
        let refs = build_references(&files).unwrap();
        assert_eq!(refs[0].uri, AUTHOR_SIGNATURE_PATH);
        assert_eq!(refs[0].digest, EMPTY_SHA256);
    }
}
