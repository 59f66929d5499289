// Module declarations
pub mod archive;
pub mod core;
pub mod models;

// Re-export commonly used types
pub use archive::{from_path, supported_extensions, Archive, SevenZArchive, ZipArchive};
pub use core::path::ArchivePath;
pub use models::ArchiveError;
