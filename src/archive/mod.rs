// Archive format variants behind one compress/uncompress contract
pub mod sevenz_archive;
pub mod zip_archive;

use std::path::{Path, PathBuf};

use crate::core::path::ArchivePath;
use crate::models::ArchiveError;

pub use sevenz_archive::SevenZArchive;
pub use zip_archive::ZipArchive;

/// Uniform contract over archive formats
///
/// Both operations default to failing with `ArchiveError::Unsupported`, so a
/// variant that only supports one direction implements just that one.
pub trait Archive {
    /// Compress files or directory trees into the archive
    ///
    /// # Arguments
    /// * `sources` - Files and/or directories to compress, in order
    /// * `prefix` - Archive-relative path the entries are placed under
    fn compress(
        &self,
        sources: &[PathBuf],
        prefix: Option<&ArchivePath>,
    ) -> Result<(), ArchiveError> {
        let _ = (sources, prefix);
        Err(ArchiveError::Unsupported("compress"))
    }

    /// Uncompress the archive into the destination directory
    fn uncompress(&self, destination: &Path) -> Result<(), ArchiveError> {
        let _ = destination;
        Err(ArchiveError::Unsupported("uncompress"))
    }
}

/// Pick an archive variant for a path, keyed on its extension
///
/// Fails with `ArchiveError::UnsupportedFormat` when no variant handles the
/// extension, so unsupported formats surface at construction time rather
/// than on first use.
pub fn from_path(path: &Path) -> Result<Box<dyn Archive>, ArchiveError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "zip" => Ok(Box::new(ZipArchive::new(path))),
        "7z" => Ok(Box::new(SevenZArchive::new(path))),
        other => Err(ArchiveError::UnsupportedFormat(format!(
            "no archive variant handles .{} files",
            if other.is_empty() { "?" } else { other }
        ))),
    }
}

/// Extensions handled by `from_path`
pub fn supported_extensions() -> Vec<&'static str> {
    vec!["zip", "7z"]
}
