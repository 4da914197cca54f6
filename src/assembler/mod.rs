//! Package assembly pipeline
//!
//! Orchestrates the strict sequence resolve → digest → sign author →
//! re-digest with the author artifact → sign distributor → archive. Each
//! stage consumes the previous stage's output; the first error aborts the
//! whole run and no archive is left behind. The re-digest step is what
//! chains the signatures: the distributor's signed scope textually includes
//! the author signature artifact.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::archive::{write_archive, ArchiveError};
use crate::files::{PackageFile, SignatureFile};
use crate::manifest::TizenManifest;
use crate::resolver::{resolve_files, ResolveError};
use crate::signature::{
    build_references, render_unsigned, DigestError, DocumentError, ExternalSigner, Reference,
    SignatureRole, SignerError, SignerIdentity,
};

/// Certificate configuration for both signing roles. A role without an
/// identity is skipped entirely; this is caller policy, not an error.
#[derive(Debug, Clone, Default)]
pub struct SigningConfig {
    pub author: Option<SignerIdentity>,
    pub distributor: Option<SignerIdentity>,
}

/// Pipeline states, in strict order. No loops, no re-entry; `Aborted` is a
/// terminal reachable from any state on first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Resolving,
    DigestingBase,
    SigningAuthor,
    DigestingWithAuthor,
    SigningDistributor,
    Archiving,
    Done,
    Aborted,
}

/// Errors from package assembly. Each variant names the failing stage.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("resolving package files failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("reference digest pass failed: {0}")]
    Digest(#[from] DigestError),

    #[error("{role} signature document rendering failed: {source}")]
    Document {
        role: SignatureRole,
        source: DocumentError,
    },

    #[error("{role} signing failed: {source}")]
    Signing {
        role: SignatureRole,
        source: SignerError,
    },

    #[error("archive write failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Result type for assembly
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Drives one package build from manifest to signed archive
pub struct PackageAssembler<S: ExternalSigner> {
    signer: S,
    config: SigningConfig,
    quiet: bool,
    state: AssemblyState,
}

impl<S: ExternalSigner> PackageAssembler<S> {
    pub fn new(signer: S, config: SigningConfig) -> Self {
        Self {
            signer,
            config,
            quiet: false,
            state: AssemblyState::Resolving,
        }
    }

    /// Suppress stage progress output on stderr
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Current pipeline state
    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Run the full pipeline once. Returns the path of the written archive.
    pub fn assemble(
        &mut self,
        manifest: &TizenManifest,
        project_root: &Path,
        output: &Path,
    ) -> AssemblyResult<PathBuf> {
        match self.run(manifest, project_root, output) {
            Ok(path) => {
                self.state = AssemblyState::Done;
                Ok(path)
            }
            Err(err) => {
                self.state = AssemblyState::Aborted;
                Err(err)
            }
        }
    }

    fn run(
        &mut self,
        manifest: &TizenManifest,
        project_root: &Path,
        output: &Path,
    ) -> AssemblyResult<PathBuf> {
        self.enter(AssemblyState::Resolving, "Resolving package files...");
        let mut files = resolve_files(manifest, project_root)?;

        self.enter(AssemblyState::DigestingBase, "Digesting base files...");
        let mut references = build_references(&files)?;

        if let Some(identity) = self.config.author.clone() {
            self.enter(AssemblyState::SigningAuthor, "Signing author signature...");
            let signature = self.sign_role(SignatureRole::Author, &references, &identity)?;
            files.push(PackageFile::Signature(signature));

            // Chaining step: the distributor signs over the base files plus
            // the finished author signature artifact.
            self.enter(
                AssemblyState::DigestingWithAuthor,
                "Digesting with author signature...",
            );
            references = build_references(&files)?;
        }

        if let Some(identity) = self.config.distributor.clone() {
            self.enter(
                AssemblyState::SigningDistributor,
                "Signing distributor signature...",
            );
            let signature = self.sign_role(SignatureRole::Distributor, &references, &identity)?;
            files.push(PackageFile::Signature(signature));
        }

        self.enter(AssemblyState::Archiving, "Writing package archive...");
        write_archive(&files, output)?;

        Ok(output.to_path_buf())
    }

    fn sign_role(
        &self,
        role: SignatureRole,
        references: &[Reference],
        identity: &SignerIdentity,
    ) -> AssemblyResult<SignatureFile> {
        let unsigned = render_unsigned(role, references)
            .map_err(|source| AssemblyError::Document { role, source })?;
        let signed = self
            .signer
            .sign(unsigned.as_bytes(), identity)
            .map_err(|source| AssemblyError::Signing { role, source })?;
        Ok(SignatureFile::new(role, signed))
    }

    fn enter(&mut self, state: AssemblyState, message: &str) {
        self.state = state;
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignerResult;
    use std::cell::RefCell;

    /// Deterministic in-process signer: prefixes the unsigned document so
    /// tests can tell signed artifacts apart from their inputs.
    struct MockSigner {
        documents: RefCell<Vec<String>>,
    }

    impl MockSigner {
        fn new() -> Self {
            Self {
                documents: RefCell::new(Vec::new()),
            }
        }
    }

    impl ExternalSigner for MockSigner {
        fn sign(&self, unsigned: &[u8], _identity: &SignerIdentity) -> SignerResult<Vec<u8>> {
            let document = String::from_utf8(unsigned.to_vec()).unwrap();
            self.documents.borrow_mut().push(document);
            let mut signed = b"SIGNED\n".to_vec();
            signed.extend_from_slice(unsigned);
            Ok(signed)
        }
    }

    fn identity(name: &str) -> SignerIdentity {
        SignerIdentity::new(PathBuf::from(name), "pw".to_string())
    }

    #[test]
    fn assembler_starts_in_resolving_state() {
        let assembler = PackageAssembler::new(MockSigner::new(), SigningConfig::default());
        assert_eq!(assembler.state(), AssemblyState::Resolving);
    }

    #[test]
    fn unsigned_run_reaches_done() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = TizenManifest::new("demo");
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/demo"), b"exec").unwrap();

        let mut assembler =
            PackageAssembler::new(MockSigner::new(), SigningConfig::default()).quiet(true);
        let output = dir.path().join("demo.tpk");
        assembler.assemble(&manifest, dir.path(), &output).unwrap();
        assert_eq!(assembler.state(), AssemblyState::Done);
        assert!(output.is_file());
    }

    #[test]
    fn missing_artifact_aborts_before_signing() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = TizenManifest::new("demo");

        let signer = MockSigner::new();
        let config = SigningConfig {
            author: Some(identity("author.p12")),
            distributor: Some(identity("dist.p12")),
        };
        let mut assembler = PackageAssembler::new(signer, config).quiet(true);
        let output = dir.path().join("demo.tpk");
        let err = assembler.assemble(&manifest, dir.path(), &output).unwrap_err();

        assert!(matches!(err, AssemblyError::Resolve(_)));
        assert_eq!(assembler.state(), AssemblyState::Aborted);
        assert!(!output.exists());
    }

    #[test]
    fn distributor_document_references_author_signature() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = TizenManifest::new("demo");
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/demo"), b"exec").unwrap();

        let signer = MockSigner::new();
        let config = SigningConfig {
            author: Some(identity("author.p12")),
            distributor: Some(identity("dist.p12")),
        };
        let mut assembler = PackageAssembler::new(signer, config).quiet(true);
        let output = dir.path().join("demo.tpk");
        assembler.assemble(&manifest, dir.path(), &output).unwrap();

        let documents = assembler.signer.documents.borrow();
        assert_eq!(documents.len(), 2);
        assert!(!documents[0].contains("author-signature.xml"));
        assert!(documents[1].contains(r#"<Reference URI="author-signature.xml">"#));
    }
}
