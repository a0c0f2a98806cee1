//! Error types for the packaging engine.
//!
//! Validation findings that abort the build travel inside
//! [`PackagerError::Configuration`] so the caller can render the full warning
//! and error text before exiting.

use crate::archive::ArchiveError;
use crate::descriptor::DescriptorError;
use crate::validate::ValidationReport;
use thiserror::Error;

/// Errors that can occur while packaging a cartridge.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// A package with the same name is already registered.
    #[error("package {name} is already declared")]
    DuplicatePackage {
        /// The conflicting package name.
        name: String,
    },

    /// Declared packages resolve to no source files.
    #[error("There are configured packages, but without source files.")]
    Configuration {
        /// The complete report, including warnings.
        report: Box<ValidationReport>,
    },

    /// Assembling a package archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Reading or merging a descriptor failed.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_package_names_the_package() {
        let err = PackagerError::DuplicatePackage {
            name: "share_linux".to_owned(),
        };
        assert!(err.to_string().contains("share_linux"));
    }

    #[test]
    fn configuration_error_keeps_report() {
        let err = PackagerError::Configuration {
            report: Box::new(ValidationReport::new("demo")),
        };
        assert!(err.to_string().contains("without source files"));
        let PackagerError::Configuration { report } = err else {
            panic!("expected configuration error");
        };
        assert_eq!(report.project_name(), "demo");
    }
}
