//! In-memory XML element tree.
//!
//! [`XmlElement`] is the tree primitive the connector builds requests with.
//! Each element has a local name, an optional [`Namespace`], attributes in
//! insertion order, child elements in document order and optional text.
//! Namespace declarations are tracked separately from attributes so the
//! writer can place `xmlns` declarations where they are first needed.

use crate::utils;

/// An XML namespace: a URI together with the prefix used to write it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// The namespace URI.
    pub uri: String,
    /// The conventional prefix. Empty means the default namespace.
    pub prefix: String,
}

impl Namespace {
    /// Creates a namespace from a URI and prefix.
    pub fn new(uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix: prefix.into(),
        }
    }

    /// Name of the attribute that declares this namespace.
    pub fn declaration_key(&self) -> String {
        if self.prefix.is_empty() {
            utils::XMLNS.to_string()
        } else {
            format!("{}:{}", utils::XMLNS, self.prefix)
        }
    }
}

/// An XML element with attributes, children and text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Local name (without prefix).
    pub name: String,
    /// Element namespace, `None` for unqualified elements.
    pub namespace: Option<Namespace>,
    /// Attributes as (qualified name, value) pairs.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Character data of the element.
    ///
    /// Mixed content is not preserved: all text runs of an element are
    /// concatenated here and written before its children.
    pub text: Option<String>,
    /// Namespaces declared on this element.
    pub declarations: Vec<Namespace>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>, namespace: Option<&Namespace>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.cloned(),
            ..Default::default()
        }
    }

    /// Creates an empty element in the given namespace.
    pub fn qualified(name: impl Into<String>, namespace: &Namespace) -> Self {
        Self::new(name, Some(namespace))
    }

    /// Returns the name as it is written, including the prefix.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => utils::qualified_name(&ns.prefix, &self.name),
            None => self.name.clone(),
        }
    }

    /// Replaces the namespace of this element only.
    pub fn set_namespace(&mut self, namespace: Option<&Namespace>) {
        self.namespace = namespace.cloned();
    }

    /// Sets an attribute, replacing the value if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder form of [`XmlElement::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Returns the value of an attribute by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder form of [`XmlElement::set_text`].
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Returns the text content, if any.
    ///
    /// For mixed content this is every text run joined together, so
    /// `<a>x<b/>y</a>` reads as `xy`.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Appends a child element.
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Builder form of [`XmlElement::add_child`].
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.add_child(child);
        self
    }

    /// Returns the first child with the given local name, in any namespace.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == local_name)
    }

    /// Returns the first child with the given local name, mutably.
    pub fn child_mut(&mut self, local_name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|child| child.name == local_name)
    }

    /// Returns true if the element has at least one child element.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if the element carries at least one attribute.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Returns true if the element has no children, attributes or text.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty() && self.text.is_none()
    }

    /// Declares a namespace on this element. Declaring the same namespace
    /// twice is a no-op.
    pub fn declare_namespace(&mut self, namespace: &Namespace) {
        if !self.declarations.contains(namespace) {
            self.declarations.push(namespace.clone());
        }
    }

    /// Iterates over this element and all of its descendants, depth first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first iterator over an element and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
