//! Error types for archive assembly.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while planning or writing a package archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Two sources map to the same in-archive path.
    #[error(
        "package {package} maps both {first} and {second} to archive entry {entry}; \
         duplicate entries are not allowed"
    )]
    DuplicateEntry {
        /// The package whose archive collides.
        package: String,
        /// The colliding in-archive path.
        entry: String,
        /// The source that claimed the entry first.
        first: Utf8PathBuf,
        /// The source that collided with it.
        second: Utf8PathBuf,
    },

    /// Reading a source or writing the archive failed.
    #[error("I/O error during archive assembly: {0}")]
    Io(#[from] std::io::Error),

    /// The zip writer rejected an entry.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
