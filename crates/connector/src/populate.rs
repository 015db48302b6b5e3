//! Field populators.
//!
//! Each optional protocol field is expressed as one populator call: look the
//! parameter up, and if it has a value add exactly one attribute or element
//! for it. Absent and blank parameters leave the tree untouched and are not
//! an error, so request builders read as flat lists of calls.

use crate::config::{Namespaces, RequestSettings};
use crate::error::{ConnectorError, Result};
use crate::parameters::ParameterSource;
use ews_xml::{Namespace, NamespaceNormalizer, XmlElement, parse_fragment};
use tracing::trace;

/// Applies parameters of one request to the element tree being built.
#[derive(Clone, Copy)]
pub struct FieldPopulator<'a> {
    params: &'a dyn ParameterSource,
    settings: &'a RequestSettings,
}

impl<'a> FieldPopulator<'a> {
    /// Creates a populator reading from `params`.
    pub fn new(params: &'a dyn ParameterSource, settings: &'a RequestSettings) -> Self {
        Self { params, settings }
    }

    /// The parameters being read.
    pub fn params(&self) -> &'a dyn ParameterSource {
        self.params
    }

    /// The namespaces elements are created in.
    pub fn namespaces(&self) -> &'a Namespaces {
        self.settings.namespaces()
    }

    /// The rewrite rule into the types namespace.
    pub fn normalizer(&self) -> &'a NamespaceNormalizer {
        self.settings.normalizer()
    }

    /// Creates an empty element in the types namespace.
    pub fn types_element(&self, name: &str) -> XmlElement {
        XmlElement::qualified(name, &self.namespaces().types)
    }

    /// Creates an empty element in the messages namespace.
    pub fn messages_element(&self, name: &str) -> XmlElement {
        XmlElement::qualified(name, &self.namespaces().messages)
    }

    /// Sets `attribute` on `element` from `parameter`.
    ///
    /// Returns true if the attribute was added.
    pub fn attribute(&self, element: &mut XmlElement, parameter: &str, attribute: &str) -> bool {
        match self.params.value(parameter) {
            Some(value) => {
                trace!(parameter, attribute, "populated attribute");
                element.set_attribute(attribute, value);
                true
            }
            None => false,
        }
    }

    /// Appends a types-namespace child `element_name` carrying the value of
    /// `parameter` as text.
    ///
    /// Returns true if the child was added.
    pub fn element(&self, parent: &mut XmlElement, parameter: &str, element_name: &str) -> bool {
        match self.params.value(parameter) {
            Some(value) => {
                trace!(parameter, element = element_name, "populated element");
                parent.add_child(self.types_element(element_name).with_text(value));
                true
            }
            None => false,
        }
    }

    /// Sets the text of an existing element from `parameter`.
    ///
    /// Returns true if the text was set.
    pub fn text(&self, element: &mut XmlElement, parameter: &str) -> bool {
        match self.params.value(parameter) {
            Some(value) => {
                trace!(parameter, element = %element.name, "populated text");
                element.set_text(value);
                true
            }
            None => false,
        }
    }

    /// Parses the value of `parameter` as an XML fragment.
    ///
    /// Returns `Ok(None)` when the parameter is absent or blank.
    pub fn fragment(&self, parameter: &str) -> Result<Option<XmlElement>> {
        self.params
            .value(parameter)
            .map(|value| {
                parse_fragment(value).map_err(|source| ConnectorError::from_xml(parameter, source))
            })
            .transpose()
    }

    /// Parses the value of `parameter` and rewrites it into the types
    /// namespace.
    pub fn normalized_fragment(&self, parameter: &str) -> Result<Option<XmlElement>> {
        Ok(self
            .fragment(parameter)?
            .map(|element| self.normalizer().normalize(element)))
    }

    /// Appends the fragment held by `parameter`, rewritten into the types
    /// namespace.
    ///
    /// Returns true if a child was added.
    pub fn direct_element(&self, parent: &mut XmlElement, parameter: &str) -> Result<bool> {
        match self.normalized_fragment(parameter)? {
            Some(element) => {
                trace!(parameter, element = %element.name, "populated fragment");
                parent.add_child(element);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Like [`FieldPopulator::direct_element`], but the root of the fragment
    /// is placed in `namespace` while its descendants stay in the types
    /// namespace.
    pub fn direct_element_in(
        &self,
        parent: &mut XmlElement,
        parameter: &str,
        namespace: &Namespace,
    ) -> Result<bool> {
        match self.normalized_fragment(parameter)? {
            Some(mut element) => {
                trace!(parameter, element = %element.name, namespace = %namespace.uri, "populated fragment");
                element.set_namespace(Some(namespace));
                parent.add_child(element);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
