//! Namespace normalization of XML fragments.
//!
//! User supplied fragments arrive with whatever namespace (or none) their
//! author chose. Before they are embedded in a request they are rewritten so
//! that every element, at every depth, belongs to one target namespace.
//! Local names, attributes, text and child order are left as they were, which
//! makes the rewrite idempotent. The one exception is an attribute whose
//! prefix is rebound to the target: it moves to a fresh prefix so it keeps
//! its namespace.

use crate::element::{Namespace, XmlElement};
use crate::error::{Result, XmlError};
use crate::reader::parse_fragment;
use crate::utils;
use std::collections::HashSet;
use tracing::trace;

/// The fragment's own binding of the target prefix, and the prefix its
/// attributes are moved to when it points elsewhere.
#[derive(Debug, Clone)]
struct Binding {
    uri: String,
    renamed: Option<String>,
}

/// Rewrites the namespace of every element in a tree to a fixed target.
///
/// The rule is validated once in [`NamespaceNormalizer::new`]; the value is
/// immutable afterwards and can be shared freely across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNormalizer {
    target: Namespace,
}

impl NamespaceNormalizer {
    /// Creates a normalizer for the given target namespace.
    ///
    /// Fails with [`XmlError::Transform`] when the URI is empty or the
    /// prefix is not a usable NCName.
    pub fn new(target: Namespace) -> Result<Self> {
        if target.uri.trim().is_empty() {
            return Err(XmlError::Transform(
                "target namespace URI must not be empty".to_string(),
            ));
        }
        if !target.prefix.is_empty() {
            if !utils::is_ncname(&target.prefix) {
                return Err(XmlError::Transform(format!(
                    "'{}' is not a valid namespace prefix",
                    target.prefix
                )));
            }
            if utils::is_reserved_prefix(&target.prefix) {
                return Err(XmlError::Transform(format!(
                    "namespace prefix '{}' is reserved",
                    target.prefix
                )));
            }
        }
        Ok(Self { target })
    }

    /// The namespace every element is rewritten to.
    pub fn target(&self) -> &Namespace {
        &self.target
    }

    /// Rewrites the tree and returns it.
    pub fn normalize(&self, mut element: XmlElement) -> XmlElement {
        self.normalize_in_place(&mut element);
        element
    }

    /// Rewrites the tree in place.
    ///
    /// Prefix bindings carried over from the fragment that would clash with
    /// the target prefix are dropped. Attributes that used such a binding
    /// keep their namespace under a fresh prefix (`t1`, `t2`, ...) declared
    /// on the element that dropped it.
    pub fn normalize_in_place(&self, element: &mut XmlElement) {
        let mut taken: HashSet<String> = element
            .descendants()
            .flat_map(|e| {
                let declared = e.declarations.iter().map(|d| d.prefix.clone());
                let used = e
                    .attributes
                    .iter()
                    .filter_map(|(key, _)| utils::split_qname(key).0.map(str::to_string));
                declared.chain(used).collect::<Vec<_>>()
            })
            .collect();
        taken.insert(self.target.prefix.clone());
        self.rewrite(element, None, &mut taken);
    }

    fn rewrite(&self, element: &mut XmlElement, inherited: Option<&Binding>, taken: &mut HashSet<String>) {
        let declared = element
            .declarations
            .iter()
            .position(|declaration| declaration.prefix == self.target.prefix)
            .map(|index| element.declarations.remove(index).uri);
        let own = element
            .namespace
            .take()
            .filter(|namespace| namespace.prefix == self.target.prefix)
            .map(|namespace| namespace.uri);
        element.namespace = Some(self.target.clone());

        let mut binding = inherited.cloned();
        let rebound = declared
            .or(own)
            .filter(|uri| binding.as_ref().map(|b| &b.uri) != Some(uri));
        if let Some(uri) = rebound {
            let renamed = if uri != self.target.uri && self.prefix_in_use(element) {
                let fresh = self.fresh_prefix(taken);
                element.declare_namespace(&Namespace::new(uri.clone(), fresh.clone()));
                Some(fresh)
            } else {
                None
            };
            binding = Some(Binding { uri, renamed });
        }

        if let Some(fresh) = binding.as_ref().and_then(|b| b.renamed.as_deref()) {
            for (key, _) in &mut element.attributes {
                let renamed_key = match utils::split_qname(key) {
                    (Some(prefix), local) if prefix == self.target.prefix => {
                        utils::qualified_name(fresh, local)
                    }
                    _ => continue,
                };
                *key = renamed_key;
            }
        }

        for child in &mut element.children {
            self.rewrite(child, binding.as_ref(), taken);
        }
    }

    fn prefix_in_use(&self, element: &XmlElement) -> bool {
        element.descendants().any(|e| {
            e.attributes
                .iter()
                .any(|(key, _)| utils::split_qname(key).0 == Some(self.target.prefix.as_str()))
        })
    }

    fn fresh_prefix(&self, taken: &mut HashSet<String>) -> String {
        let base = if self.target.prefix.is_empty() { "ns" } else { self.target.prefix.as_str() };
        let mut n = 1;
        loop {
            let candidate = format!("{}{}", base, n);
            if taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Parses a fragment and rewrites it.
    pub fn normalize_fragment(&self, fragment: &str) -> Result<XmlElement> {
        let element = parse_fragment(fragment)?;
        trace!(element = %element.name, namespace = %self.target.uri, "normalizing fragment");
        Ok(self.normalize(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> NamespaceNormalizer {
        NamespaceNormalizer::new(Namespace::new(
            "http://schemas.microsoft.com/exchange/services/2006/types",
            "t",
        ))
        .expect("valid rule")
    }

    #[test]
    fn test_every_element_gets_target_namespace() -> Result<()> {
        let normalizer = normalizer();
        let element = normalizer.normalize_fragment(
            r#"<a:Restriction xmlns:a="urn:other"><IsEqualTo><FieldURI FieldURI="item:Subject"/></IsEqualTo></a:Restriction>"#,
        )?;

        assert!(
            element
                .descendants()
                .all(|e| e.namespace.as_ref() == Some(normalizer.target()))
        );
        assert_eq!(element.descendants().count(), 3);
        Ok(())
    }

    #[test]
    fn test_structure_is_preserved() -> Result<()> {
        let normalizer = normalizer();
        let original = parse_fragment(
            r#"<Ranges><Range Start="1" End="3"><Note>first</Note></Range><Range Start="5"/></Ranges>"#,
        )?;
        let normalized = normalizer.normalize(original.clone());

        assert_eq!(normalized.name, original.name);
        let before: Vec<_> = original
            .descendants()
            .map(|e| (e.name.clone(), e.attributes.clone(), e.text.clone()))
            .collect();
        let after: Vec<_> = normalized
            .descendants()
            .map(|e| (e.name.clone(), e.attributes.clone(), e.text.clone()))
            .collect();
        assert_eq!(before, after);
        Ok(())
    }

    #[test]
    fn test_normalization_is_idempotent() -> Result<()> {
        let normalizer = normalizer();
        let once = normalizer.normalize_fragment(r#"<x:Periods xmlns:x="urn:x"><Period Id="p"/></x:Periods>"#)?;
        let twice = normalizer.normalize(once.clone());
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_attribute_namespaces_are_untouched() -> Result<()> {
        let element = normalizer().normalize_fragment(r#"<Item xmlns:x="urn:x" x:kind="a"/>"#)?;
        assert_eq!(element.attribute("x:kind"), Some("a"));
        Ok(())
    }

    #[test]
    fn test_clashing_prefix_binding_is_dropped() -> Result<()> {
        let element = normalizer()
            .normalize_fragment(r#"<t:Mailbox xmlns:t="urn:wrong" xmlns:x="urn:x"/>"#)?;
        assert_eq!(element.declarations, vec![Namespace::new("urn:x", "x")]);
        Ok(())
    }

    #[test]
    fn test_clashing_prefix_attributes_keep_their_namespace() -> Result<()> {
        let normalizer = NamespaceNormalizer::new(Namespace::new("urn:types", "t"))?;
        let element = normalizer
            .normalize_fragment(r#"<x:Foo xmlns:x="urn:x" xmlns:t="urn:wrong" t:attr="1"/>"#)?;

        assert_eq!(element.attribute("t1:attr"), Some("1"));
        assert_eq!(element.attribute("t:attr"), None);
        assert_eq!(element.declarations, vec![Namespace::new("urn:wrong", "t1")]);
        assert_eq!(
            crate::writer::to_xml_string(&element, false)?,
            r#"<t:Foo xmlns:t="urn:types" xmlns:t1="urn:wrong" t1:attr="1"/>"#
        );
        assert_eq!(normalizer.normalize(element.clone()), element);
        Ok(())
    }

    #[test]
    fn test_attributes_sharing_the_element_prefix_keep_their_namespace() -> Result<()> {
        let normalizer = NamespaceNormalizer::new(Namespace::new("urn:types", "t"))?;
        let element = normalizer
            .normalize_fragment(r#"<t:Item xmlns:t="urn:legacy" t:flag="on"><t:Body t:kind="x"/></t:Item>"#)?;

        assert_eq!(element.attribute("t1:flag"), Some("on"));
        assert_eq!(element.declarations, vec![Namespace::new("urn:legacy", "t1")]);
        assert_eq!(element.children[0].attribute("t1:kind"), Some("x"));
        assert!(element.children[0].declarations.is_empty());
        Ok(())
    }

    #[test]
    fn test_renamed_prefix_applies_to_descendants_until_rebound() -> Result<()> {
        let normalizer = NamespaceNormalizer::new(Namespace::new("urn:types", "t"))?;
        let element = normalizer.normalize_fragment(
            r#"<a xmlns:t="urn:wrong" xmlns:t1="urn:taken" t1:keep="k"><b t:one="1"><c xmlns:t="urn:types" t:two="2"/></b></a>"#,
        )?;

        let b = &element.children[0];
        let c = &b.children[0];
        assert_eq!(element.attribute("t1:keep"), Some("k"));
        assert!(element.declarations.contains(&Namespace::new("urn:wrong", "t2")));
        assert_eq!(b.attribute("t2:one"), Some("1"));
        assert_eq!(c.attribute("t:two"), Some("2"));
        assert!(c.declarations.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_fragment_is_a_parse_error() {
        let error = normalizer().normalize_fragment("<Restriction>").unwrap_err();
        assert!(!error.is_transform());
    }

    #[test]
    fn test_invalid_rule_is_a_transform_error() {
        let empty_uri = NamespaceNormalizer::new(Namespace::new("", "t")).unwrap_err();
        assert!(empty_uri.is_transform());

        let bad_prefix = NamespaceNormalizer::new(Namespace::new("urn:t", "1t")).unwrap_err();
        assert!(bad_prefix.is_transform());

        let reserved = NamespaceNormalizer::new(Namespace::new("urn:t", "xmlns")).unwrap_err();
        assert!(reserved.is_transform());

        assert!(NamespaceNormalizer::new(Namespace::new("urn:t", "")).is_ok());
    }
}
