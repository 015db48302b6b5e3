//! Error types for request assembly.
//!
//! Every failure while building a request is reported as one
//! [`ConnectorError`] carrying the underlying cause:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Parse` | a parameter value is not well-formed XML |
//! | `Transform` | the namespace rewrite rule could not be set up |
//! | `Validation` | a well-formed fragment lacks a field the builder requires |
//! | `Xml` | XML handling failed outside any parameter, e.g. while serializing |
//! | `OutputBinding` | the host refused the finished envelope |
//!
//! A missing optional parameter is never an error.

use ews_xml::XmlError;
use thiserror::Error;

/// Boxed error returned by host collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for request assembly.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// A parameter value could not be parsed as an XML fragment.
    #[error("couldn't convert element from parameter '{parameter}': {source}")]
    Parse {
        /// The parameter whose value was malformed.
        parameter: String,
        /// The underlying XML error.
        #[source]
        source: XmlError,
    },

    /// The namespace rewrite rule is unusable.
    #[error("couldn't transform message: {source}")]
    Transform {
        /// The underlying XML error.
        #[source]
        source: XmlError,
    },

    /// A fragment is missing a field the builder needs.
    #[error("parameter '{parameter}' is missing required field '{field}'")]
    Validation {
        /// The parameter holding the fragment.
        parameter: String,
        /// The missing child element or attribute.
        field: String,
    },

    /// XML handling failed outside of any single parameter.
    #[error("XML error: {source}")]
    Xml {
        /// The underlying XML error.
        #[source]
        source: XmlError,
    },

    /// The envelope could not be handed to the message context.
    #[error("couldn't set envelope on message context: {source}")]
    OutputBinding {
        /// The error reported by the host.
        #[source]
        source: BoxError,
    },
}

impl ConnectorError {
    /// Wraps an XML error raised while handling a parameter.
    ///
    /// Rewrite rule failures become [`ConnectorError::Transform`], everything
    /// else is a [`ConnectorError::Parse`] naming the parameter.
    pub fn from_xml(parameter: &str, source: XmlError) -> Self {
        if source.is_transform() {
            ConnectorError::Transform { source }
        } else {
            ConnectorError::Parse {
                parameter: parameter.to_string(),
                source,
            }
        }
    }

    /// Creates a validation error for a missing fragment field.
    pub fn missing_field(parameter: &str, field: &str) -> Self {
        ConnectorError::Validation {
            parameter: parameter.to_string(),
            field: field.to_string(),
        }
    }

    /// Short category name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectorError::Parse { .. } => "parse",
            ConnectorError::Transform { .. } => "transform",
            ConnectorError::Validation { .. } => "validation",
            ConnectorError::Xml { .. } => "xml",
            ConnectorError::OutputBinding { .. } => "output-binding",
        }
    }
}

impl From<XmlError> for ConnectorError {
    /// Converts an XML error that is not tied to a parameter.
    fn from(source: XmlError) -> Self {
        if source.is_transform() {
            ConnectorError::Transform { source }
        } else {
            ConnectorError::Xml { source }
        }
    }
}

/// Result type alias for request assembly.
pub type Result<T> = std::result::Result<T, ConnectorError>;
