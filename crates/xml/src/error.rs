//! Error types for XML fragment parsing, writing and namespace rewriting.

use thiserror::Error;

/// Error types for XML reading, writing and namespace normalization.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The fragment is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An attribute could not be read from a start tag.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// An entity or character reference could not be resolved.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// The input is not valid UTF-8.
    #[error("invalid UTF-8 in XML input: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The fragment contains no element at all.
    #[error("XML fragment has no root element")]
    NoRootElement,

    /// The fragment contains more than one top-level element.
    #[error("XML fragment has more than one root element (second root: <{0}>)")]
    MultipleRoots(String),

    /// The input ended while an element was still open.
    #[error("XML fragment ended before <{0}> was closed")]
    UnclosedElement(String),

    /// Elements are nested deeper than [`crate::reader::MAX_DEPTH`].
    #[error("XML fragment is nested deeper than {limit} elements")]
    TooDeep {
        /// The maximum nesting depth.
        limit: usize,
    },

    /// An attribute uses a prefix that no enclosing element declares.
    #[error("attribute '{0}' uses an undeclared namespace prefix")]
    UnboundPrefix(String),

    /// Non-whitespace character data appeared outside the root element.
    #[error("text outside of the root element: {0:?}")]
    TextOutsideRoot(String),

    /// The namespace rewrite rule could not be set up.
    #[error("invalid namespace rewrite rule: {0}")]
    Transform(String),

    /// Writing the serialized document failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XmlError {
    /// Returns true when the error comes from the namespace rewrite rule
    /// rather than from the input document.
    pub fn is_transform(&self) -> bool {
        matches!(self, XmlError::Transform(_))
    }
}

/// Result type alias for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;
