//! Marker upsert shared by both descriptor flavours.
//!
//! An upsert locates a parent by path, removes every existing marker
//! element below it, and appends a fresh marker only when the new value is
//! non-empty. Repeating an upsert with the same value leaves exactly one
//! marker behind.

use super::tree::{Element, Node};

/// What to do when the parent path does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingParent {
    /// Create the missing path segments.
    Create,
    /// Leave the document untouched.
    Skip,
}

/// Result of one upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A marker carrying the value is now present.
    Written,
    /// The value was empty; any previous marker was removed.
    Cleared,
    /// The parent was missing and [`MissingParent::Skip`] applied.
    ParentMissing,
}

/// Locate the element at `path` below `root`.
///
/// With [`MissingParent::Create`] the lookup never fails.
pub fn locate<'a>(root: &'a mut Element, path: &[&str], missing: MissingParent) -> Option<&'a mut Element> {
    let mut current = root;
    for segment in path {
        if current.child(segment).is_none() {
            if missing == MissingParent::Skip {
                return None;
            }
            current.push(Node::Element(Element::new(*segment)));
        }
        current = current.child_mut(segment)?;
    }
    Some(current)
}

/// Replace the `marker` children of the element at `parent` with one
/// carrying `value`.
pub fn upsert(root: &mut Element, parent: &[&str], missing: MissingParent, marker: &str, value: &str) -> Upsert {
    let Some(container) = locate(root, parent, missing) else {
        return Upsert::ParentMissing;
    };
    container.remove_children(marker);
    if value.is_empty() {
        return Upsert::Cleared;
    }
    container.push_element(Element::with_text(marker, value));
    Upsert::Written
}
