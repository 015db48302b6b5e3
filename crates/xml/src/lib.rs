//! # ews-xml
//!
//! XML support for the EWS connector.
//!
//! ## Features
//!
//! - **Element tree**: [`XmlElement`] and [`Namespace`] describe the documents
//!   the connector builds: local names, namespaces, attributes, children, text.
//! - **Fragment reader**: [`parse_fragment`] turns user supplied XML strings into
//!   trees using quick-xml's namespace-aware reader.
//! - **Writer**: [`to_xml_string`] and [`to_xml_document`] serialize trees and
//!   place `xmlns` declarations where they are needed.
//! - **Namespace normalization**: [`NamespaceNormalizer`] rewrites every element
//!   of a tree into one target namespace.
//!
//! ## Example
//!
//! ```
//! use ews_xml::{Namespace, NamespaceNormalizer, to_xml_string};
//!
//! let types = Namespace::new("http://schemas.microsoft.com/exchange/services/2006/types", "t");
//! let normalizer = NamespaceNormalizer::new(types)?;
//! let ranges = normalizer.normalize_fragment("<Ranges><Range/></Ranges>")?;
//! let xml = to_xml_string(&ranges, false)?;
//! assert!(xml.starts_with("<t:Ranges"));
//! # Ok::<(), ews_xml::XmlError>(())
//! ```

pub mod element;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod writer;
mod utils;

pub use element::{Namespace, XmlElement};
pub use error::{Result, XmlError};
pub use normalize::NamespaceNormalizer;
pub use reader::{MAX_DEPTH, parse_fragment};
pub use writer::{to_xml_document, to_xml_string, write_element};
