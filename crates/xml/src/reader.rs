//! Parsing of XML fragments into [`XmlElement`] trees.
//!
//! Fragments are read with a quick-xml `NsReader` so that element prefixes
//! are resolved against the declarations in scope. Declarations are not kept
//! as attributes: prefixed ones are recorded as element declarations, the
//! default one is dropped since every element carries its own namespace.
//! Comments, processing instructions and the XML declaration are skipped.
//!
//! Nesting is limited to [`MAX_DEPTH`] elements, and attributes must use
//! prefixes that are declared in scope.

use crate::element::{Namespace, XmlElement};
use crate::error::{Result, XmlError};
use crate::utils;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{NamespaceResolver, ResolveResult};
use quick_xml::reader::NsReader;

/// Maximum element nesting depth accepted by [`parse_fragment`].
///
/// The root element is at depth 1.
pub const MAX_DEPTH: usize = 256;

/// Parse a single-rooted XML fragment into an element tree.
///
/// # Examples
///
/// ```
/// use ews_xml::parse_fragment;
///
/// let element = parse_fragment(r#"<t:FolderId xmlns:t="urn:t" Id="AAA=" ChangeKey="CK1"/>"#)?;
/// assert_eq!(element.name, "FolderId");
/// assert_eq!(element.attribute("Id"), Some("AAA="));
/// # Ok::<(), ews_xml::XmlError>(())
/// ```
pub fn parse_fragment(xml: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (namespace, event) = {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = match &event {
                Event::Start(start) | Event::Empty(start) => resolve_namespace(&resolved, start)?,
                _ => None,
            };
            (namespace, event)
        };

        match event {
            Event::Start(start) => {
                check_depth(&stack)?;
                stack.push(open_element(&start, namespace, reader.resolver())?);
            }
            Event::Empty(start) => {
                check_depth(&stack)?;
                let element = open_element(&start, namespace, reader.resolver())?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => match stack.pop() {
                Some(element) => close_element(element, &mut stack, &mut root)?,
                // An unmatched end tag is rejected by the reader itself.
                None => return Err(XmlError::NoRootElement),
            },
            Event::Text(text) => {
                let raw = std::str::from_utf8(&text)?;
                append_text(&mut stack, &unescape(raw)?)?;
            }
            Event::CData(data) => {
                append_text(&mut stack, std::str::from_utf8(&data)?)?;
            }
            Event::GeneralRef(reference) => {
                let name = std::str::from_utf8(&reference)?;
                append_text(&mut stack, &unescape(&format!("&{};", name))?)?;
            }
            Event::Eof => break,
            // Comments, processing instructions, declarations and doctypes.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::UnclosedElement(open.qualified_name()));
    }
    root.ok_or(XmlError::NoRootElement)
}

/// Maps the resolved namespace of a start tag to a [`Namespace`].
///
/// Prefixes that are not declared anywhere in the fragment resolve to no
/// namespace; such elements are kept under their local name.
fn resolve_namespace(resolved: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Option<Namespace>> {
    match resolved {
        ResolveResult::Bound(ns) => {
            let uri = std::str::from_utf8(ns.as_ref())?;
            if uri.is_empty() {
                return Ok(None);
            }
            let prefix = match start.name().prefix() {
                Some(prefix) => std::str::from_utf8(prefix.as_ref())?.to_string(),
                None => String::new(),
            };
            Ok(Some(Namespace::new(uri, prefix)))
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => Ok(None),
    }
}

/// Fails when one more element would exceed [`MAX_DEPTH`].
fn check_depth(stack: &[XmlElement]) -> Result<()> {
    if stack.len() >= MAX_DEPTH {
        return Err(XmlError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

fn open_element(
    start: &BytesStart<'_>,
    namespace: Option<Namespace>,
    resolver: &NamespaceResolver,
) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.local_name().as_ref())?.to_string();
    let mut element = XmlElement {
        name,
        namespace,
        ..Default::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?;
        let raw = std::str::from_utf8(&attribute.value)?;
        let value = unescape(raw)?.into_owned();
        if utils::is_namespace_declaration(key) {
            // Prefixed bindings are kept for attributes such as `xsi:type`.
            if let (Some(_), prefix) = utils::split_qname(key) {
                element.declare_namespace(&Namespace::new(value, prefix));
            }
            continue;
        }
        if let (ResolveResult::Unknown(_), _) = resolver.resolve_attribute(attribute.key) {
            return Err(XmlError::UnboundPrefix(key.to_string()));
        }
        element.attributes.push((key.to_string(), value));
    }

    let own = element.namespace.clone();
    element
        .declarations
        .retain(|declaration| Some(declaration) != own.as_ref());
    Ok(element)
}

fn close_element(
    mut element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    if element
        .text
        .as_deref()
        .is_some_and(|text| text.trim().is_empty())
    {
        element.text = None;
    }

    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRoots(element.qualified_name())),
        None => *root = Some(element),
    }
    Ok(())
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::TextOutsideRoot(text.trim().to_string())),
    }
}
