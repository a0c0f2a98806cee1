//! Publication descriptor documents and metadata merges.
//!
//! A [`DescriptorDocument`] is parsed from XML into an owned [`Element`]
//! tree, mutated by [`pom::merge`] or [`ivy::merge`], and written back out.
//! Both merges use the same marker [`upsert`](upsert::upsert), so running
//! them any number of times with the same metadata yields the same document.

pub mod ivy;
pub mod pom;
mod read;
mod tree;
pub mod upsert;
mod write;

pub use tree::{Element, Node};

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Errors raised while loading or saving a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The document is not well-formed XML.
    #[error("descriptor is not well-formed XML: {reason}")]
    Parse {
        /// Parser diagnostics.
        reason: String,
    },

    /// The document has no root element.
    #[error("descriptor has no root element")]
    MissingRoot,

    /// Reading or writing the descriptor file failed.
    #[error("cannot access descriptor {path}: {source}")]
    Io {
        /// The descriptor file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialised.
    #[error("cannot serialise descriptor: {reason}")]
    Write {
        /// Writer diagnostics.
        reason: String,
    },

    /// A descriptor file failed to parse.
    #[error("invalid descriptor {path}: {reason}")]
    InvalidFile {
        /// The descriptor file.
        path: Utf8PathBuf,
        /// Why parsing failed.
        reason: String,
    },
}

/// A mutable descriptor document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorDocument {
    prolog: Vec<Node>,
    root: Element,
}

impl DescriptorDocument {
    /// Wrap an existing root element.
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Parse`] for malformed XML and
    /// [`DescriptorError::MissingRoot`] when there is no root element.
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let (prolog, root) = read::parse(text)?;
        Ok(Self { prolog, root })
    }

    /// Read and parse the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Io`] when the file cannot be read and
    /// [`DescriptorError::InvalidFile`] when it does not parse.
    pub fn load(path: &Utf8Path) -> Result<Self, DescriptorError> {
        let text = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|err| DescriptorError::InvalidFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Write the document to `path`, replacing its content.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Write`] when serialisation fails and
    /// [`DescriptorError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Utf8Path) -> Result<(), DescriptorError> {
        fs::write(path, self.to_xml()?).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Return the root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Return the root element for modification.
    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Render the document as indented XML.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Write`] when the XML writer fails.
    pub fn to_xml(&self) -> Result<String, DescriptorError> {
        write::to_xml(&self.prolog, &self.root)
    }
}
