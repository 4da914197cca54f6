//! tpkgen - Tizen package builder
//!
//! Turns a declarative `tizen-manifest.xml` plus on-disk artifacts into a
//! single signed `.tpk` archive. The manifest is the only build
//! configuration: executables and icons it declares are resolved from the
//! project tree, digested, covered by chained author and distributor XML
//! signatures, and written into a deterministic zip container.

pub mod archive;
pub mod assembler;
pub mod context;
pub mod files;
pub mod manifest;
pub mod resolver;
pub mod scaffold;
pub mod signature;

pub use assembler::{AssemblyError, AssemblyState, PackageAssembler, SigningConfig};
pub use context::Context;
pub use manifest::{TizenManifest, MANIFEST_PATH};
pub use signature::{ExternalSigner, SignatureRole, SignerIdentity, Xmlsec1Signer};
