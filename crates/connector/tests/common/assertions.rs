//! Element tree assertions.

use ews_xml::{Namespace, XmlElement};

/// Asserts the local names of the children of `element`, in order.
pub fn assert_children(element: &XmlElement, expected: &[&str]) {
    let actual: Vec<&str> = element.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        actual, expected,
        "Unexpected children of {}",
        element.qualified_name()
    );
}

/// Asserts that `element` and every descendant is in `namespace`.
pub fn assert_all_in_namespace(element: &XmlElement, namespace: &Namespace) {
    for descendant in element.descendants() {
        assert_eq!(
            descendant.namespace.as_ref(),
            Some(namespace),
            "Element {} is not in {}",
            descendant.qualified_name(),
            namespace.uri
        );
    }
}

/// Asserts the attributes of `element`, in order.
pub fn assert_attributes(element: &XmlElement, expected: &[(&str, &str)]) {
    let actual: Vec<(&str, &str)> = element
        .attributes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        actual, expected,
        "Unexpected attributes on {}",
        element.qualified_name()
    );
}

/// Asserts that no element in the tree is an empty container, i.e. has no
/// children, attributes or text, except those named in `allowed`.
pub fn assert_no_empty_containers(element: &XmlElement, allowed: &[&str]) {
    for descendant in element.descendants() {
        if allowed.contains(&descendant.name.as_str()) {
            continue;
        }
        assert!(
            !descendant.is_empty(),
            "Element {} is empty",
            descendant.qualified_name()
        );
    }
}
