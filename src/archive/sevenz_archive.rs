use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader, SevenZWriter};

use crate::archive::Archive;
use crate::core::compressor::{self, EntryWriter};
use crate::core::extractor::{self, EntryTree};
use crate::core::path::ArchivePath;
use crate::models::ArchiveError;

/// 7z package archive
///
/// Compression walks the source trees into the 7z writer. Extraction reads
/// every entry once, rebuilds the recorded hierarchy as a virtual file tree
/// and materializes it recursively under the destination.
pub struct SevenZArchive {
    path: PathBuf,
}

impl SevenZArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Archive for SevenZArchive {
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

        let writer = SevenZWriter::new(file).map_err(|e| {
            ArchiveError::Open(format!(
                "Failed to create 7z writer for {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut sink = SevenZEntrySink { writer };
        let prefix = prefix.cloned().unwrap_or_default();

        compressor::compress_sources(&mut sink, sources, &prefix)?;

        sink.writer.finish().map_err(|e| {
            ArchiveError::Write(format!("Failed to finalize 7z archive: {}", e))
        })?;

        Ok(())
    }

    fn uncompress(&self, destination: &Path) -> Result<(), ArchiveError> {
        let file = File::open(&self.path).map_err(|e| {
            ArchiveError::Open(format!("Could not open {}: {}", self.path.display(), e))
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| {
                ArchiveError::Open(format!(
                    "Failed to get metadata of {}: {}",
                    self.path.display(),
                    e
                ))
            })?
            .len();

        let mut reader = SevenZReader::new(file, file_size, Password::empty()).map_err(|e| {
            ArchiveError::Open(format!(
                "Failed to read 7z archive {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "extracting {} into {}",
            self.path.display(),
            destination.display()
        );

        // One pass over the archive: collect every entry with its bytes
        let mut entries: Vec<(String, bool, Vec<u8>)> = Vec::new();
        reader
            .for_each_entries(|entry, reader| {
                let mut data = Vec::new();
                if !entry.is_directory() {
                    reader
                        .read_to_end(&mut data)
                        .map_err(|e| sevenz_rust::Error::io(e))?;
                }
                entries.push((entry.name().to_string(), entry.is_directory(), data));
                Ok(true)
            })
            .map_err(|e| {
                ArchiveError::Extraction(format!(
                    "Failed to read entries of {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut tree = EntryTree::new();
        for (name, is_directory, data) in entries {
            if is_directory {
                tree.insert_dir(&name)?;
            } else {
                tree.insert_file(&name, data)?;
            }
        }

        extractor::extract(tree.entries(), destination)
    }
}

/// Entry writer over an open 7z handle
struct SevenZEntrySink {
    writer: SevenZWriter<File>,
}

impl EntryWriter for SevenZEntrySink {
    fn add_file(&mut self, disk_path: &Path, archive_path: &ArchivePath) -> Result<(), ArchiveError> {
        // Stream directly from disk, no intermediate buffer
        let mut input = File::open(disk_path)?;

        self.writer
            .push_archive_entry(
                SevenZArchiveEntry::from_path(disk_path, archive_path.as_str().to_string()),
                Some(&mut input),
            )
            .map_err(|e| {
                ArchiveError::Write(format!(
                    "Failed to add file {} to archive: {}",
                    archive_path, e
                ))
            })?;

        Ok(())
    }

    fn add_empty_dir(
        &mut self,
        disk_path: &Path,
        archive_path: &ArchivePath,
    ) -> Result<(), ArchiveError> {
        self.writer
            .push_archive_entry::<&[u8]>(
                SevenZArchiveEntry::from_path(disk_path, archive_path.as_str().to_string()),
                None,
            )
            .map_err(|e| {
                ArchiveError::Write(format!(
                    "Failed to add directory {} to archive: {}",
                    archive_path, e
                ))
            })?;

        Ok(())
    }
}
