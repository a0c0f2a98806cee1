//! Minimal owned element tree for descriptor documents.
//!
//! Names are kept in their qualified textual form (`e:displayName`), and
//! namespace declarations are ordinary `xmlns`/`xmlns:<prefix>` attributes.

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
    /// A comment.
    Comment(String),
}

/// An element with attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element holding a single text node.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Return the qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Return the value of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute `name`, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove attribute `name`, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Return all child nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements called `name`.
    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Return the first child element called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Return the first child element called `name` for modification.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Append a child node.
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Append a child element.
    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Remove every child element called `name`, returning how many went.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(e) if e.name == name));
        before - self.children.len()
    }

    /// Concatenate the direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Visit this element and every descendant element, depth first.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Element)) {
        visit(self);
        for child in self.elements_mut() {
            child.walk_mut(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut root = Element::new("info");
        root.push_element(Element::with_text("description", "one"));
        root.push(Node::Comment("note".to_owned()));
        root.push_element(Element::with_text("description", "two"));
        root.push_element(Element::new("license"));
        root
    }

    #[test]
    fn remove_children_drops_every_match() {
        let mut root = sample();
        assert_eq!(root.remove_children("description"), 2);
        let names: Vec<&str> = root.elements().map(Element::name).collect();
        assert_eq!(names, vec!["license"]);
        assert_eq!(root.nodes().len(), 2);
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut root = Element::new("ivy-module");
        root.set_attribute("version", "1.0");
        root.set_attribute("xmlns:e", "x");
        root.set_attribute("version", "2.0");
        assert_eq!(root.attributes().len(), 2);
        assert_eq!(root.attribute("version"), Some("2.0"));
        assert_eq!(root.remove_attribute("xmlns:e").as_deref(), Some("x"));
    }

    #[test]
    fn child_lookup_returns_first_match() {
        let root = sample();
        assert_eq!(root.child("description").map(Element::text).as_deref(), Some("one"));
        assert!(root.child("missing").is_none());
    }

    fn first_license(root: &Element) -> Option<&Element> {
        let name = String::from("license");
        root.child(&name)
    }

    #[test]
    fn child_outlives_the_looked_up_name() {
        let root = sample();
        assert_eq!(first_license(&root).map(Element::name), Some("license"));
        let name = String::from("description");
        let found: Vec<&Element> = root.children_named(&name).collect();
        drop(name);
        assert_eq!(found.len(), 2);
    }
}
