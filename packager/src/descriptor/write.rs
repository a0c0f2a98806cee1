//! Serialising an [`Element`] tree through the `sxd-document` writer.
//!
//! The tree is rebuilt as an sxd DOM with indentation text inserted between
//! element children, then formatted by [`Writer`]. Qualified names and
//! `xmlns` declarations are carried over verbatim.

use super::DescriptorError;
use super::tree::{Element, Node};
use sxd_document::Package;
use sxd_document::dom::{self, Document};
use sxd_document::writer::Writer;

const INDENT: &str = "    ";

/// Render `prolog` and `root` as a complete XML document.
pub(super) fn to_xml(prolog: &[Node], root: &Element) -> Result<String, DescriptorError> {
    let package = Package::new();
    let doc = package.as_document();

    for node in prolog {
        if let Node::Comment(text) = node {
            doc.root().append_child(doc.create_comment(text));
        }
    }
    doc.root().append_child(build(&doc, root, 0));

    let mut out = Vec::new();
    Writer::new()
        .set_single_quotes(false)
        .set_write_encoding(true)
        .format_document(&doc, &mut out)
        .map_err(|e| DescriptorError::Write {
            reason: e.to_string(),
        })?;
    out.push(b'\n');
    String::from_utf8(out).map_err(|e| DescriptorError::Write {
        reason: e.to_string(),
    })
}

fn indentation(depth: usize) -> String {
    format!("\n{}", INDENT.repeat(depth))
}

fn build<'d>(doc: &Document<'d>, element: &Element, depth: usize) -> dom::Element<'d> {
    let built = doc.create_element(element.name());
    for (name, value) in element.attributes() {
        built.set_attribute_value(name.as_str(), value);
    }

    let nodes = element.nodes();
    if nodes.iter().all(|n| matches!(n, Node::Text(_))) {
        if !nodes.is_empty() {
            built.append_child(doc.create_text(&element.text()));
        }
        return built;
    }

    let inner = indentation(depth + 1);
    for node in nodes {
        match node {
            Node::Element(child) => {
                built.append_child(doc.create_text(&inner));
                built.append_child(build(doc, child, depth + 1));
            }
            Node::Text(text) => {
                built.append_child(doc.create_text(&inner));
                built.append_child(doc.create_text(text.trim()));
            }
            Node::Comment(text) => {
                built.append_child(doc.create_text(&inner));
                built.append_child(doc.create_comment(text));
            }
        }
    }
    built.append_child(doc.create_text(&indentation(depth)));
    built
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::read::parse;

    fn sample() -> Element {
        let mut root = Element::new("project");
        root.set_attribute("xmlns", "urn:pom");
        let mut properties = Element::new("properties");
        properties.push_element(Element::with_text("cartridge-displayname", "Shop & Co <EU>"));
        root.push_element(properties);
        root.push_element(Element::new("empty"));
        root
    }

    #[test]
    fn renders_declaration_and_indented_children() {
        let xml = to_xml(&[], &sample()).expect("serialise");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{xml}");
        assert!(xml.contains("<project xmlns=\"urn:pom\">\n    <properties>\n        <cartridge-displayname>"), "{xml}");
        assert!(xml.contains("Shop &amp; Co &lt;EU"), "{xml}");
        assert!(xml.contains("\n    </properties>\n    <empty/>\n</project>"), "{xml}");
    }

    #[test]
    fn escaped_content_survives_a_round_trip() {
        let mut root = sample();
        root.set_attribute("title", "say \"hi\" & 'bye'");

        let (_, parsed) = parse(&to_xml(&[], &root).expect("serialise")).expect("parse");

        assert_eq!(parsed.attributes(), root.attributes());
        let display_name = parsed
            .child("properties")
            .and_then(|p| p.child("cartridge-displayname"))
            .map(Element::text);
        assert_eq!(display_name.as_deref(), Some("Shop & Co <EU>"));
    }

    #[test]
    fn prefixed_names_are_written_verbatim() {
        let mut root = Element::new("ivy-module");
        root.set_attribute("xmlns:e", "http://ant.apache.org/ivy/extra");
        let mut info = Element::new("info");
        info.push_element(Element::with_text("e:displayName", "Shop"));
        root.push_element(info);

        let xml = to_xml(&[Node::Comment(" generated ".to_owned())], &root).expect("serialise");

        assert!(xml.contains("<!-- generated -->"), "{xml}");
        assert!(xml.contains("xmlns:e=\"http://ant.apache.org/ivy/extra\""), "{xml}");
        assert!(xml.contains("<e:displayName>Shop</e:displayName>"), "{xml}");
    }
}
