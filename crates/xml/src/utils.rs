//! Helper functions for qualified names and namespace declarations.

/// Attribute name used to declare the default namespace.
pub const XMLNS: &str = "xmlns";

/// Checks if a raw attribute key declares a namespace.
///
/// Both the default declaration (`xmlns`) and prefixed declarations
/// (`xmlns:t`) count.
pub fn is_namespace_declaration(key: &str) -> bool {
    key == XMLNS || key.starts_with("xmlns:")
}

/// Splits a qualified name into its optional prefix and local part.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Joins a prefix and a local name. An empty prefix yields the bare local name.
pub fn qualified_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

/// Checks if a string is a valid XML NCName (a name without a colon).
///
/// Only the ASCII subset of the production is accepted, which covers every
/// prefix used in SOAP and EWS documents.
pub fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Checks if a prefix is reserved by the XML namespaces recommendation.
pub fn is_reserved_prefix(prefix: &str) -> bool {
    prefix.eq_ignore_ascii_case("xml") || prefix.eq_ignore_ascii_case(XMLNS)
}
