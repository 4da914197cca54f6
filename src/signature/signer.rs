//! External signer invocation
//!
//! The cryptographic signing operation is delegated entirely to an external
//! tool (`xmlsec1` by default): it canonicalizes the staged unsigned
//! document, fills in the digest and signature values, and writes the signed
//! artifact. This module stages the unsigned document, runs the tool with
//! captured stderr, and reads the artifact back. Staging files live in a
//! temporary directory released on every exit path, and passphrases are
//! redacted from all diagnostic output.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

/// Errors from external signing
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("failed to stage unsigned document: {0}")]
    Staging(#[source] io::Error),

    #[error("failed to launch signer {tool}: {source}")]
    Spawn { tool: String, source: io::Error },

    #[error("signer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to read signed artifact: {0}")]
    ReadArtifact(#[source] io::Error),
}

/// Result type for signing operations
pub type SignerResult<T> = Result<T, SignerError>;

/// Certificate locator and credential for one signing role
#[derive(Clone)]
pub struct SignerIdentity {
    /// Path of the PKCS#12 certificate file
    pub certificate: PathBuf,
    /// Certificate passphrase
    pub passphrase: String,
}

impl SignerIdentity {
    pub fn new(certificate: PathBuf, passphrase: String) -> Self {
        Self {
            certificate,
            passphrase,
        }
    }
}

// Manual impl so the passphrase never leaks through debug formatting.
impl fmt::Debug for SignerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerIdentity")
            .field("certificate", &self.certificate)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// The trusted out-of-process signing boundary. Implementations take the
/// unsigned canonical document and produce the fully signed document bytes.
pub trait ExternalSigner {
    fn sign(&self, unsigned: &[u8], identity: &SignerIdentity) -> SignerResult<Vec<u8>>;
}

/// Signs by shelling out to `xmlsec1 --sign`
#[derive(Debug, Clone)]
pub struct Xmlsec1Signer {
    tool: PathBuf,
}

impl Xmlsec1Signer {
    pub fn new(tool: PathBuf) -> Self {
        Self { tool }
    }
}

impl Default for Xmlsec1Signer {
    fn default() -> Self {
        Self::new(PathBuf::from("xmlsec1"))
    }
}

impl ExternalSigner for Xmlsec1Signer {
    fn sign(&self, unsigned: &[u8], identity: &SignerIdentity) -> SignerResult<Vec<u8>> {
        let staging = tempfile::tempdir().map_err(SignerError::Staging)?;
        let unsigned_path = staging.path().join("unsigned.xml");
        let signed_path = staging.path().join("signed.xml");
        fs::write(&unsigned_path, unsigned).map_err(SignerError::Staging)?;

        let output = Command::new(&self.tool)
            .arg("--sign")
            .arg("--output")
            .arg(&signed_path)
            .arg("--pkcs12")
            .arg(&identity.certificate)
            .arg("--pwd")
            .arg(&identity.passphrase)
            .arg(&unsigned_path)
            .output()
            .map_err(|source| SignerError::Spawn {
                tool: self.tool.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(SignerError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let signed = fs::read(&signed_path).map_err(SignerError::ReadArtifact)?;
        staging.close().map_err(SignerError::Staging)?;
        Ok(signed)
    }
}
