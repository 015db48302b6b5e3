//! The finished SOAP envelope.

use crate::config::Namespaces;
use ews_xml::{XmlElement, to_xml_document, to_xml_string};

const HEADER: usize = 0;
const BODY: usize = 1;

/// A SOAP envelope with exactly one header and one body.
///
/// The envelope root declares the SOAP, types and messages namespaces so the
/// serialized request binds each prefix once at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    root: XmlElement,
}

impl Envelope {
    /// Wraps `header` and a body holding `request` in an envelope.
    pub fn new(namespaces: &Namespaces, header: XmlElement, request: XmlElement) -> Self {
        let mut root = XmlElement::qualified("Envelope", &namespaces.soap);
        root.declare_namespace(&namespaces.types);
        root.declare_namespace(&namespaces.messages);

        let body = XmlElement::qualified("Body", &namespaces.soap).with_child(request);
        root.add_child(header);
        root.add_child(body);
        Self { root }
    }

    /// The `Envelope` element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// The `Header` element.
    pub fn header(&self) -> &XmlElement {
        &self.root.children[HEADER]
    }

    /// The `Body` element.
    pub fn body(&self) -> &XmlElement {
        &self.root.children[BODY]
    }

    /// The operation element inside the body.
    pub fn request(&self) -> Option<&XmlElement> {
        self.body().children.first()
    }

    /// Consumes the envelope, returning its root element.
    pub fn into_element(self) -> XmlElement {
        self.root
    }

    /// Serializes the envelope without an XML declaration.
    pub fn to_xml_string(&self, pretty: bool) -> ews_xml::Result<String> {
        to_xml_string(&self.root, pretty)
    }

    /// Serializes the envelope as a complete UTF-8 document.
    pub fn to_xml_document(&self, pretty: bool) -> ews_xml::Result<String> {
        to_xml_document(&self.root, pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_structure() {
        let namespaces = Namespaces::default();
        let header = XmlElement::qualified("Header", &namespaces.soap);
        let request = XmlElement::qualified("FindItem", &namespaces.messages);
        let envelope = Envelope::new(&namespaces, header, request);

        assert_eq!(envelope.root().qualified_name(), "soapenv:Envelope");
        assert_eq!(envelope.header().qualified_name(), "soapenv:Header");
        assert_eq!(envelope.body().qualified_name(), "soapenv:Body");
        assert_eq!(envelope.request().map(|r| r.name.as_str()), Some("FindItem"));
    }

    #[test]
    fn test_envelope_serialization() -> ews_xml::Result<()> {
        let namespaces = Namespaces::default();
        let header = XmlElement::qualified("Header", &namespaces.soap);
        let request = XmlElement::qualified("SendItem", &namespaces.messages)
            .with_attribute("SaveItemToFolder", "false");
        let xml = Envelope::new(&namespaces, header, request).to_xml_string(false)?;

        assert_eq!(
            xml,
            concat!(
                r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" "#,
                r#"xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types" "#,
                r#"xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">"#,
                "<soapenv:Header/>",
                r#"<soapenv:Body><m:SendItem SaveItemToFolder="false"/></soapenv:Body>"#,
                "</soapenv:Envelope>"
            )
        );
        Ok(())
    }
}
