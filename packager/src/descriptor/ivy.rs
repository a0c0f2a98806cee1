//! Metadata merge for Ivy module descriptors.
//!
//! The Ivy descriptor gains `info/description` and the namespaced
//! `info/e:displayName`. Unlike the POM merge, a missing `info` element is
//! not created: the condition is logged and the metadata is left out.

use super::DescriptorDocument;
use super::upsert::{MissingParent, Upsert, upsert};
use crate::metadata::ProjectMetadata;
use log::error;

/// Namespace of Ivy extra attributes and elements.
pub const EXTRA_NAMESPACE: &str = "http://ant.apache.org/ivy/extra";

/// Declaration binding the `e` prefix on the document root.
pub const EXTRA_DECLARATION: &str = "xmlns:e";

/// Container of the cartridge markers.
pub const INFO: &str = "info";

/// Marker holding the description.
pub const DESCRIPTION: &str = "description";

/// Marker holding the display name.
pub const DISPLAY_NAME: &str = "e:displayName";

/// Merge `metadata` into the Ivy `document`.
///
/// The root always declares the extra namespace. Returns `false` when the
/// document has no `info` element and nothing else was written.
pub fn merge(document: &mut DescriptorDocument, metadata: &ProjectMetadata) -> bool {
    let root = document.root_mut();
    root.set_attribute(EXTRA_DECLARATION, EXTRA_NAMESPACE);

    for (marker, value) in [
        (DESCRIPTION, metadata.description()),
        (DISPLAY_NAME, metadata.display_name()),
    ] {
        if upsert(root, &[INFO], MissingParent::Skip, marker, value) == Upsert::ParentMissing {
            error!("Ivy descriptor does not contain an {INFO} element; cartridge metadata not written");
            return false;
        }
    }
    true
}
