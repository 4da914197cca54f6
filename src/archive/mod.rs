//! Package archive writer
//!
//! Serializes the final ordered file set into a single `.tpk` zip container.
//! Member order is list order, timestamps are pinned to the zip epoch, and
//! permissions are fixed, so identical inputs produce byte-identical
//! archives. A failure partway through removes the partial output; the
//! caller never sees a half-written archive reported as success.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::files::{FileError, PackageFile};

/// Errors from archive writing
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("duplicate package path {path}")]
    DuplicatePath { path: String },

    #[error("failed to create archive {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("content for {path} unavailable: {source}")]
    Content { path: String, source: FileError },

    #[error("failed to write member {path}: {source}")]
    Member { path: String, source: io::Error },

    #[error("failed to add member {path}: {source}")]
    AddMember {
        path: String,
        source: zip::result::ZipError,
    },

    #[error("failed to finalize archive: {0}")]
    Finalize(#[from] zip::result::ZipError),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Write the ordered file set to a zip container at `output`. On any error
/// the partial output file is removed before returning.
pub fn write_archive(files: &[PackageFile], output: &Path) -> ArchiveResult<()> {
    let result = write_members(files, output);
    if result.is_err() {
        let _ = fs::remove_file(output);
    }
    result
}

fn write_members(files: &[PackageFile], output: &Path) -> ArchiveResult<()> {
    let file = File::create(output).map_err(|source| ArchiveError::Create {
        path: output.to_path_buf(),
        source,
    })?;
    let mut archive = ZipWriter::new(file);

    // Pinned timestamp and mode keep reruns byte-identical.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    let mut seen = HashSet::new();
    for entry in files {
        let path = entry.package_path();
        if !seen.insert(path.to_string()) {
            return Err(ArchiveError::DuplicatePath {
                path: path.to_string(),
            });
        }
        let content = entry.content().map_err(|source| ArchiveError::Content {
            path: path.to_string(),
            source,
        })?;
        archive
            .start_file(path, options)
            .map_err(|source| ArchiveError::AddMember {
                path: path.to_string(),
                source,
            })?;
        archive
            .write_all(&content)
            .map_err(|source| ArchiveError::Member {
                path: path.to_string(),
                source,
            })?;
    }

    let mut file = archive.finish()?;
    file.flush().map_err(|source| ArchiveError::Member {
        path: output.display().to_string(),
        source,
    })?;
    Ok(())
}
