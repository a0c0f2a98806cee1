//! Metadata merge for Maven POM descriptors.
//!
//! The POM gains `properties/cartridge-displayname` and
//! `properties/cartridge-description`. A missing `properties` element is
//! created, so this merge always succeeds.

use super::DescriptorDocument;
use super::upsert::{MissingParent, upsert};
use crate::metadata::ProjectMetadata;

/// Container of the cartridge markers.
pub const PROPERTIES: &str = "properties";

/// Marker holding the display name.
pub const DISPLAY_NAME: &str = "cartridge-displayname";

/// Marker holding the description.
pub const DESCRIPTION: &str = "cartridge-description";

/// Merge `metadata` into the POM `document`.
pub fn merge(document: &mut DescriptorDocument, metadata: &ProjectMetadata) {
    let root = document.root_mut();
    for (marker, value) in [
        (DISPLAY_NAME, metadata.display_name()),
        (DESCRIPTION, metadata.description()),
    ] {
        let outcome = upsert(root, &[PROPERTIES], MissingParent::Create, marker, value);
        log::trace!("pom {marker}: {outcome:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Element;

    const POM: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <artifactId>shop</artifactId>
</project>"#;

    fn metadata(description: &str) -> ProjectMetadata {
        let mut meta = ProjectMetadata::new("shop");
        meta.set_display_name("Shop Cartridge").set_description(description);
        meta
    }

    fn properties(doc: &DescriptorDocument) -> &Element {
        doc.root().child(PROPERTIES).expect("properties element")
    }

    #[test]
    fn creates_missing_properties() {
        let mut doc = DescriptorDocument::parse(POM).expect("parse");
        merge(&mut doc, &metadata("Storefront"));

        let props = properties(&doc);
        assert_eq!(props.child(DISPLAY_NAME).map(Element::text).as_deref(), Some("Shop Cartridge"));
        assert_eq!(props.child(DESCRIPTION).map(Element::text).as_deref(), Some("Storefront"));
    }

    #[test]
    fn repeated_merges_through_xml_are_idempotent() {
        let mut doc = DescriptorDocument::parse(POM).expect("parse");
        merge(&mut doc, &metadata("Storefront"));
        let first = doc.to_xml().expect("serialise");

        let mut again = DescriptorDocument::parse(&first).expect("reparse");
        merge(&mut again, &metadata("Storefront"));
        merge(&mut again, &metadata("Storefront"));

        assert_eq!(again.to_xml().expect("serialise"), first);
        assert_eq!(properties(&again).children_named(DISPLAY_NAME).count(), 1);
        assert_eq!(properties(&again).children_named(DESCRIPTION).count(), 1);
    }

    #[test]
    fn empty_description_is_not_written() {
        let mut doc = DescriptorDocument::parse(POM).expect("parse");
        merge(&mut doc, &metadata("Storefront"));
        merge(&mut doc, &metadata(""));

        let props = properties(&doc);
        assert!(props.child(DESCRIPTION).is_none());
        assert!(props.child(DISPLAY_NAME).is_some());
    }

    #[test]
    fn unrelated_properties_survive() {
        let mut doc = DescriptorDocument::parse(
            r#"<project><properties><java.version>21</java.version></properties></project>"#,
        )
        .expect("parse");
        merge(&mut doc, &metadata("d"));

        let names: Vec<&str> = properties(&doc).elements().map(Element::name).collect();
        assert_eq!(names, vec!["java.version", DISPLAY_NAME, DESCRIPTION]);
    }
}
