//! Serialization of [`XmlElement`] trees with quick-xml.
//!
//! The writer keeps track of the namespace bindings in scope. An element whose
//! namespace is not bound yet gets an `xmlns` declaration of its own, an
//! unqualified element below a default namespace resets it with `xmlns=""`,
//! and the declarations recorded on the element follow.

use crate::element::{Namespace, XmlElement};
use crate::error::{Result, XmlError};
use crate::utils;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Serialize an element tree to an XML string without an XML declaration.
pub fn to_xml_string(element: &XmlElement, pretty: bool) -> Result<String> {
    let mut buffer = Vec::new();
    let mut writer = new_writer(&mut buffer, pretty);
    write_element(&mut writer, element)?;
    Ok(String::from_utf8(buffer).map_err(|e| e.utf8_error())?)
}

/// Serialize an element tree as a complete document, XML declaration included.
pub fn to_xml_document(element: &XmlElement, pretty: bool) -> Result<String> {
    let mut buffer = Vec::new();
    let mut writer = new_writer(&mut buffer, pretty);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    if !pretty {
        // The indenting writer breaks lines on its own.
        writer.get_mut().write_all(b"\n")?;
    }
    write_element(&mut writer, element)?;
    String::from_utf8(buffer).map_err(|e| XmlError::Utf8(e.utf8_error()))
}

fn new_writer<W: Write>(inner: W, pretty: bool) -> Writer<W> {
    if pretty {
        Writer::new_with_indent(inner, b' ', 2)
    } else {
        Writer::new(inner)
    }
}

/// Write an element tree to a quick-xml writer.
pub fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut scope = NamespaceScope::default();
    write_scoped(writer, element, &mut scope)
}

/// Prefix to URI bindings visible at the element being written.
#[derive(Default)]
struct NamespaceScope {
    bindings: Vec<(String, String)>,
}

impl NamespaceScope {
    fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn is_bound(&self, namespace: &Namespace) -> bool {
        self.resolve(&namespace.prefix) == Some(namespace.uri.as_str())
    }

    fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.push((prefix.to_string(), uri.to_string()));
    }
}

fn write_scoped<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
    scope: &mut NamespaceScope,
) -> Result<()> {
    let mark = scope.bindings.len();
    let qname = element.qualified_name();
    let mut start = BytesStart::new(qname.as_str());

    match &element.namespace {
        Some(namespace) if !scope.is_bound(namespace) => {
            start.push_attribute((namespace.declaration_key().as_str(), namespace.uri.as_str()));
            scope.bind(&namespace.prefix, &namespace.uri);
        }
        None if scope.resolve("").is_some_and(|uri| !uri.is_empty()) => {
            start.push_attribute((utils::XMLNS, ""));
            scope.bind("", "");
        }
        _ => {}
    }

    let own_prefix = element.namespace.as_ref().map(|ns| ns.prefix.as_str());
    for declaration in &element.declarations {
        // The element's own binding wins over a clashing declaration.
        if own_prefix == Some(declaration.prefix.as_str()) || scope.is_bound(declaration) {
            continue;
        }
        start.push_attribute((declaration.declaration_key().as_str(), declaration.uri.as_str()));
        scope.bind(&declaration.prefix, &declaration.uri);
    }

    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &element.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &element.children {
            write_scoped(writer, child, scope)?;
        }
        writer.write_event(Event::End(BytesEnd::new(qname.as_str())))?;
    }

    scope.bindings.truncate(mark);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types_ns() -> Namespace {
        Namespace::new("urn:types", "t")
    }

    fn messages_ns() -> Namespace {
        Namespace::new("urn:messages", "m")
    }

    #[test]
    fn test_declared_namespaces_are_written_once() -> Result<()> {
        let t = types_ns();
        let m = messages_ns();
        let mut root = XmlElement::new("Envelope", None);
        root.declare_namespace(&t);
        root.declare_namespace(&m);
        root.add_child(
            XmlElement::qualified("FindItem", &m)
                .with_attribute("Traversal", "Shallow")
                .with_child(XmlElement::qualified("BaseShape", &t).with_text("IdOnly")),
        );

        let xml = to_xml_string(&root, false)?;
        assert_eq!(
            xml,
            "<Envelope xmlns:t=\"urn:types\" xmlns:m=\"urn:messages\">\
             <m:FindItem Traversal=\"Shallow\"><t:BaseShape>IdOnly</t:BaseShape></m:FindItem>\
             </Envelope>"
        );
        Ok(())
    }

    #[test]
    fn test_undeclared_namespace_is_declared_locally() -> Result<()> {
        let element = XmlElement::qualified("ItemId", &types_ns()).with_attribute("Id", "X");
        let xml = to_xml_string(&element, false)?;
        assert_eq!(xml, "<t:ItemId xmlns:t=\"urn:types\" Id=\"X\"/>");
        Ok(())
    }

    #[test]
    fn test_unqualified_child_resets_default_namespace() -> Result<()> {
        let default_ns = Namespace::new("urn:default", "");
        let element =
            XmlElement::qualified("Outer", &default_ns).with_child(XmlElement::new("Inner", None));
        let xml = to_xml_string(&element, false)?;
        assert_eq!(xml, "<Outer xmlns=\"urn:default\"><Inner xmlns=\"\"/></Outer>");
        Ok(())
    }

    #[test]
    fn test_text_and_attributes_are_escaped() -> Result<()> {
        let element = XmlElement::new("QueryString", None)
            .with_attribute("ResetCache", "a\"b")
            .with_text("x < y & z");
        let xml = to_xml_string(&element, false)?;
        assert_eq!(
            xml,
            "<QueryString ResetCache=\"a&quot;b\">x &lt; y &amp; z</QueryString>"
        );
        Ok(())
    }

    #[test]
    fn test_document_has_declaration() -> Result<()> {
        let xml = to_xml_document(&XmlElement::new("Envelope", None), false)?;
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.ends_with("<Envelope/>"));
        Ok(())
    }

    #[test]
    fn test_pretty_output_is_indented() -> Result<()> {
        let element = XmlElement::new("Header", None)
            .with_child(XmlElement::new("MailboxCulture", None).with_text("en-US"));
        let xml = to_xml_string(&element, true)?;
        assert!(xml.contains("\n  <MailboxCulture>en-US</MailboxCulture>"));
        Ok(())
    }
}
