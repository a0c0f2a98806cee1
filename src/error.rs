//! Error type of the command-line front end.

use crate::config::ConfigError;
use camino::Utf8PathBuf;
use cartridge_packager::PackagerError;
use cartridge_packager::descriptor::DescriptorError;
use thiserror::Error;

/// Errors that end a `cartridge-package` run.
#[derive(Debug, Error)]
pub enum CartridgeError {
    /// The manifest could not be loaded or applied.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation, archiving, or synthesis failed.
    #[error(transparent)]
    Packager(#[from] PackagerError),

    /// A descriptor could not be read or written.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// The publication summary could not be written.
    #[error("cannot write publication summary {path}: {reason}")]
    Summary {
        /// The summary file.
        path: Utf8PathBuf,
        /// Why writing failed.
        reason: String,
    },
}

/// Result type alias using [`CartridgeError`].
pub type Result<T> = std::result::Result<T, CartridgeError>;
