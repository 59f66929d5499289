use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::archive::Archive;
use crate::core::compressor::{self, EntryWriter};
use crate::core::path::ArchivePath;
use crate::models::ArchiveError;

/// Zip container archive
///
/// Compression walks the source trees and streams each file into the zip
/// writer; extraction is delegated wholesale to the zip crate, which already
/// reproduces the recorded hierarchy (including empty directory entries).
pub struct ZipArchive {
    path: PathBuf,
}

impl ZipArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Archive for ZipArchive {
    fn compress(
        &self,
        sources: &[PathBuf],
        prefix: Option<&ArchivePath>,
    ) -> Result<(), ArchiveError> {
        // Reject bad input before any archive file is created
        compressor::validate_sources(sources)?;

        debug!(
            "compressing {} source(s) into {}",
            sources.len(),
            self.path.display()
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ArchiveError::Open(format!(
                        "Failed to create parent directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(&self.path).map_err(|e| {
            ArchiveError::Open(format!("Could not create {}: {}", self.path.display(), e))
        })?;

        let mut sink = ZipEntrySink::new(file);
        let prefix = prefix.cloned().unwrap_or_default();

        compressor::compress_sources(&mut sink, sources, &prefix)?;

        sink.finish()
    }

    fn uncompress(&self, destination: &Path) -> Result<(), ArchiveError> {
        let file = File::open(&self.path).map_err(|e| {
            ArchiveError::Open(format!("Could not open {}: {}", self.path.display(), e))
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            ArchiveError::Open(format!(
                "Failed to read zip archive {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "extracting {} into {}",
            self.path.display(),
            destination.display()
        );

        fs::create_dir_all(destination).map_err(|e| {
            ArchiveError::Extraction(format!(
                "Failed to create destination directory {}: {}",
                destination.display(),
                e
            ))
        })?;

        archive.extract(destination).map_err(|e| {
            ArchiveError::Extraction(format!(
                "Failed to extract {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// Entry writer over an open zip handle
struct ZipEntrySink {
    writer: ZipWriter<File>,
}

impl ZipEntrySink {
    fn new(file: File) -> Self {
        Self {
            writer: ZipWriter::new(file),
        }
    }

    fn finish(mut self) -> Result<(), ArchiveError> {
        self.writer.finish().map_err(|e| {
            ArchiveError::Write(format!("Failed to finalize zip archive: {}", e))
        })?;
        Ok(())
    }

    fn stored_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o755)
    }
}

impl EntryWriter for ZipEntrySink {
    fn add_file(&mut self, disk_path: &Path, archive_path: &ArchivePath) -> Result<(), ArchiveError> {
        // Already-compressed formats: store as-is, everything else: fast Deflate
        let options = if is_already_compressed(archive_path.as_str()) {
            Self::stored_options()
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(1))
                .unix_permissions(0o755)
        };

        self.writer
            .start_file(archive_path.as_str(), options)
            .map_err(|e| {
                ArchiveError::Write(format!("Failed to start entry {}: {}", archive_path, e))
            })?;

        let mut input = File::open(disk_path)?;
        io::copy(&mut input, &mut self.writer)?;

        Ok(())
    }

    fn add_empty_dir(
        &mut self,
        _disk_path: &Path,
        archive_path: &ArchivePath,
    ) -> Result<(), ArchiveError> {
        self.writer
            .add_directory(archive_path.as_str(), Self::stored_options())
            .map_err(|e| {
                ArchiveError::Write(format!(
                    "Failed to add directory {} to archive: {}",
                    archive_path, e
                ))
            })?;

        Ok(())
    }
}

/// Returns true for formats that are already compressed and won't benefit
/// from Deflate.
fn is_already_compressed(name: &str) -> bool {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    matches!(
        ext.as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "webp"
            | "mp3" | "mp4" | "ogg" | "wav" | "aac" | "flac"
            | "zip" | "7z" | "rar"
    )
}
