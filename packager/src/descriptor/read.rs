//! Parsing descriptor XML into an [`Element`] tree.
//!
//! `sxd-document` resolves namespaces while parsing, so declarations are
//! rebuilt from each element's and attribute's resolved URI and preferred
//! prefix. Prefixed declarations are then hoisted onto the root when every
//! use agrees on the URI.

use super::DescriptorError;
use super::tree::{Element, Node};
use std::collections::BTreeMap;
use sxd_document::QName;
use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};
use sxd_document::parser;

const XML_PREFIX: &str = "xml";
const XMLNS: &str = "xmlns";
const XMLNS_URI: &str = "http://www.w3.org/2000/xmlns/";

/// In-scope prefix bindings; `None` is the default namespace.
type Scope = BTreeMap<Option<String>, String>;

/// Parse `text` into its comments preceding the root and the root element.
pub(super) fn parse(text: &str) -> Result<(Vec<Node>, Element), DescriptorError> {
    let package = parser::parse(text).map_err(|e| DescriptorError::Parse {
        reason: format!("{e:?}"),
    })?;
    let document = package.as_document();

    let mut prolog = Vec::new();
    let mut root = None;
    for child in document.root().children() {
        match child {
            ChildOfRoot::Element(element) if root.is_none() => {
                root = Some(convert(element, &Scope::new()));
            }
            ChildOfRoot::Comment(comment) if root.is_none() => {
                prolog.push(Node::Comment(comment.text().to_owned()));
            }
            _ => {}
        }
    }

    let mut root = root.ok_or(DescriptorError::MissingRoot)?;
    hoist_declarations(&mut root);
    Ok((prolog, root))
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    prefix.map_or_else(|| local.to_owned(), |p| format!("{p}:{local}"))
}

fn declaration_name(prefix: Option<&str>) -> String {
    prefix.map_or_else(|| XMLNS.to_owned(), |p| format!("{XMLNS}:{p}"))
}

/// Bind `prefix` to `uri` in `scope`, recording a declaration when the
/// binding is new.
fn bind(scope: &mut Scope, declarations: &mut Vec<(String, String)>, prefix: Option<&str>, uri: &str) {
    if prefix == Some(XML_PREFIX) {
        return;
    }
    let key = prefix.map(str::to_owned);
    if scope.get(&key).map(String::as_str) != Some(uri) {
        scope.insert(key, uri.to_owned());
        declarations.push((declaration_name(prefix), uri.to_owned()));
    }
}

fn is_declaration(name: &QName<'_>, prefix: Option<&str>) -> bool {
    name.namespace_uri() == Some(XMLNS_URI)
        || prefix == Some(XMLNS)
        || (prefix.is_none() && name.local_part() == XMLNS)
}

fn convert(element: dom::Element<'_>, inherited: &Scope) -> Element {
    let mut scope = inherited.clone();
    let mut declarations = Vec::new();

    let name = element.name();
    let prefix = element.preferred_prefix();
    match name.namespace_uri() {
        Some(uri) => bind(&mut scope, &mut declarations, prefix, uri),
        None if scope.get(&None).is_some_and(|uri| !uri.is_empty()) => {
            bind(&mut scope, &mut declarations, None, "");
        }
        None => {}
    }

    let mut attributes = Vec::new();
    for attribute in element.attributes() {
        let attr_name = attribute.name();
        let attr_prefix = attribute.preferred_prefix();
        if is_declaration(&attr_name, attr_prefix) {
            continue;
        }
        let attr_prefix = match attr_name.namespace_uri() {
            Some(uri) => {
                let attr_prefix = attr_prefix.unwrap_or("ns");
                bind(&mut scope, &mut declarations, Some(attr_prefix), uri);
                Some(attr_prefix)
            }
            None => None,
        };
        attributes.push((
            qualified(attr_prefix, attr_name.local_part()),
            attribute.value().to_owned(),
        ));
    }

    let mut converted = Element::new(qualified(prefix, name.local_part()));
    for (name, value) in declarations.into_iter().chain(attributes) {
        converted.set_attribute(name, value);
    }

    for child in element.children() {
        match child {
            ChildOfElement::Element(nested) => converted.push_element(convert(nested, &scope)),
            ChildOfElement::Text(text) if !text.text().trim().is_empty() => {
                converted.push(Node::Text(text.text().to_owned()));
            }
            ChildOfElement::Comment(comment) => {
                converted.push(Node::Comment(comment.text().to_owned()));
            }
            _ => {}
        }
    }
    converted
}

/// Move prefixed namespace declarations onto `root` when every declaration
/// of that prefix in the tree binds the same URI.
fn hoist_declarations(root: &mut Element) {
    let mut bindings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    root.walk_mut(&mut |element| {
        for (name, value) in element.attributes() {
            if name.starts_with("xmlns:") {
                bindings.entry(name.clone()).or_default().push(value.clone());
            }
        }
    });

    for (name, uris) in bindings {
        let Some(first) = uris.first().cloned() else {
            continue;
        };
        if uris.iter().any(|uri| *uri != first) {
            continue;
        }
        for child in root.elements_mut() {
            child.walk_mut(&mut |element| {
                element.remove_attribute(&name);
            });
        }
        root.set_attribute(name, first);
    }
}
