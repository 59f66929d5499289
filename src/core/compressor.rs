use std::fs;
use std::path::{Path, PathBuf};

use crate::core::path::ArchivePath;
use crate::models::ArchiveError;

/// Archive writer collaborator
///
/// Seam between the recursive source walk and a concrete archive backend.
/// Implementations append entries to an open archive handle; the walk never
/// touches the handle directly.
pub trait EntryWriter {
    /// Add a regular file at the given archive-relative path
    fn add_file(&mut self, disk_path: &Path, archive_path: &ArchivePath) -> Result<(), ArchiveError>;

    /// Record an empty directory at the given archive-relative path
    fn add_empty_dir(
        &mut self,
        disk_path: &Path,
        archive_path: &ArchivePath,
    ) -> Result<(), ArchiveError>;
}

/// Reject an empty source list before any archive handle is opened
pub fn validate_sources(sources: &[PathBuf]) -> Result<(), ArchiveError> {
    if sources.is_empty() {
        return Err(ArchiveError::InvalidSource("no files provided".to_string()));
    }
    Ok(())
}

/// Compress each source independently, in the given order, under one prefix
pub fn compress_sources<W: EntryWriter>(
    writer: &mut W,
    sources: &[PathBuf],
    prefix: &ArchivePath,
) -> Result<(), ArchiveError> {
    validate_sources(sources)?;

    for source in sources {
        compress_entry(writer, source, prefix)?;
    }

    Ok(())
}

/// Compress one file or directory into the archive
///
/// The entry lands at `prefix/<name>`. Directories recurse with that path as
/// the new prefix; a directory with no children is recorded explicitly so it
/// survives the round trip.
fn compress_entry<W: EntryWriter>(
    writer: &mut W,
    source: &Path,
    prefix: &ArchivePath,
) -> Result<(), ArchiveError> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ArchiveError::InvalidSource(source.display().to_string()))?;

    let archive_path = prefix.join(name);

    let metadata = fs::symlink_metadata(source)
        .map_err(|_| ArchiveError::MissingSource(source.to_path_buf()))?;

    if metadata.is_file() {
        return writer.add_file(source, &archive_path);
    }

    if !metadata.is_dir() {
        // Symlinks, fifos, sockets and friends are not archivable entries
        return Err(ArchiveError::InvalidSource(source.display().to_string()));
    }

    let mut children: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(source)? {
        children.push(entry?.path());
    }
    // Directory listing order is platform-defined; sort for stable output
    children.sort();

    if children.is_empty() {
        writer.add_empty_dir(source, &archive_path)
    } else {
        for child in &children {
            compress_entry(writer, child, &archive_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Recording writer: captures the entry sequence without a real archive
    #[derive(Default)]
    struct RecordingWriter {
        files: Vec<(PathBuf, String)>,
        empty_dirs: Vec<String>,
    }

    impl EntryWriter for RecordingWriter {
        fn add_file(
            &mut self,
            disk_path: &Path,
            archive_path: &ArchivePath,
        ) -> Result<(), ArchiveError> {
            self.files
                .push((disk_path.to_path_buf(), archive_path.as_str().to_string()));
            Ok(())
        }

        fn add_empty_dir(
            &mut self,
            _disk_path: &Path,
            archive_path: &ArchivePath,
        ) -> Result<(), ArchiveError> {
            self.empty_dirs.push(archive_path.as_str().to_string());
            Ok(())
        }
    }

    #[test]
    fn test_single_file_lands_under_prefix() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("readme.txt");
        fs::write(&file, b"hello").unwrap();

        let mut writer = RecordingWriter::default();
        compress_sources(&mut writer, &[file.clone()], &ArchivePath::new("pkg")).unwrap();

        assert_eq!(writer.files, vec![(file, "pkg/readme.txt".to_string())]);
        assert!(writer.empty_dirs.is_empty());
    }

    #[test]
    fn test_directory_recursion_builds_nested_paths() {
        let temp = TempDir::new().unwrap();
        let proj = temp.path().join("proj");
        fs::create_dir_all(proj.join("sub")).unwrap();
        fs::write(proj.join("a.txt"), b"a").unwrap();
        fs::write(proj.join("sub/b.txt"), b"b").unwrap();

        let mut writer = RecordingWriter::default();
        compress_sources(&mut writer, &[proj], &ArchivePath::root()).unwrap();

        let paths: Vec<&str> = writer.files.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(paths, vec!["proj/a.txt", "proj/sub/b.txt"]);
    }

    #[test]
    fn test_empty_directory_recorded_at_its_own_path() {
        let temp = TempDir::new().unwrap();
        let proj = temp.path().join("proj");
        fs::create_dir_all(proj.join("empty")).unwrap();
        fs::write(proj.join("readme.md"), b"hi").unwrap();

        let mut writer = RecordingWriter::default();
        compress_sources(&mut writer, &[proj], &ArchivePath::new("pkg")).unwrap();

        assert_eq!(writer.empty_dirs, vec!["pkg/proj/empty".to_string()]);
    }

    #[test]
    fn test_multi_source_preserves_caller_order() {
        let temp = TempDir::new().unwrap();
        let b = temp.path().join("b.txt");
        let a = temp.path().join("a.txt");
        fs::write(&b, b"b").unwrap();
        fs::write(&a, b"a").unwrap();

        let mut writer = RecordingWriter::default();
        compress_sources(
            &mut writer,
            &[b.clone(), a.clone()],
            &ArchivePath::root(),
        )
        .unwrap();

        let paths: Vec<&str> = writer.files.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(paths, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let mut writer = RecordingWriter::default();
        let missing = PathBuf::from("/nonexistent/path/file.txt");
        let result = compress_sources(&mut writer, &[missing.clone()], &ArchivePath::root());

        match result {
            Err(ArchiveError::MissingSource(path)) => assert_eq!(path, missing),
            other => panic!("expected MissingSource, got {:?}", other),
        }
        assert!(writer.files.is_empty());
    }

    #[test]
    fn test_empty_source_list_is_rejected() {
        let mut writer = RecordingWriter::default();
        let result = compress_sources(&mut writer, &[], &ArchivePath::root());
        assert!(matches!(result, Err(ArchiveError::InvalidSource(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_source_is_rejected() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.txt");
        let link = temp.path().join("link.txt");
        fs::write(&target, b"data").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut writer = RecordingWriter::default();
        let result = compress_sources(&mut writer, &[link], &ArchivePath::root());
        assert!(matches!(result, Err(ArchiveError::InvalidSource(_))));
    }
}
