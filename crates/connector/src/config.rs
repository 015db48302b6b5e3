//! Connector configuration.
//!
//! The namespaces every request is built with are configuration values
//! rather than process-wide constants, so builders can be set up per host
//! and tested in isolation.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EWS_SOAP_NAMESPACE` | http://schemas.xmlsoap.org/soap/envelope/ | SOAP envelope namespace |
//! | `EWS_SOAP_PREFIX` | soapenv | SOAP envelope prefix |
//! | `EWS_TYPES_NAMESPACE` | http://schemas.microsoft.com/exchange/services/2006/types | EWS types namespace |
//! | `EWS_TYPES_PREFIX` | t | EWS types prefix |
//! | `EWS_MESSAGES_NAMESPACE` | http://schemas.microsoft.com/exchange/services/2006/messages | EWS messages namespace |
//! | `EWS_MESSAGES_PREFIX` | m | EWS messages prefix |
//! | `EWS_LOG_LEVEL` | info | Log level |
//! | `EWS_PRETTY` | false | Indent the generated XML |
//!
//! # Example
//!
//! ```rust
//! use ews_connector::{ConnectorConfig, RequestSettings};
//!
//! let config = ConnectorConfig {
//!     types_prefix: "typ".to_string(),
//!     ..Default::default()
//! };
//! let settings = RequestSettings::from_config(&config)?;
//! assert_eq!(settings.namespaces().types.prefix, "typ");
//! # Ok::<(), ews_connector::ConnectorError>(())
//! ```

use crate::error::{ConnectorError, Result};
use clap::Parser;
use ews_xml::{Namespace, NamespaceNormalizer};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// EWS types namespace.
pub const TYPES_NAMESPACE: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// EWS messages namespace.
pub const MESSAGES_NAMESPACE: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Connector configuration.
///
/// Can be built from the command line and environment with clap, or
/// programmatically starting from [`ConnectorConfig::default`].
#[derive(Debug, Clone, Parser)]
pub struct ConnectorConfig {
    /// SOAP envelope namespace URI.
    #[arg(long, env = "EWS_SOAP_NAMESPACE", default_value = SOAP_ENVELOPE_NAMESPACE)]
    pub soap_namespace: String,

    /// Prefix for the SOAP envelope namespace.
    #[arg(long, env = "EWS_SOAP_PREFIX", default_value = "soapenv")]
    pub soap_prefix: String,

    /// EWS types namespace URI.
    #[arg(long, env = "EWS_TYPES_NAMESPACE", default_value = TYPES_NAMESPACE)]
    pub types_namespace: String,

    /// Prefix for the EWS types namespace.
    #[arg(long, env = "EWS_TYPES_PREFIX", default_value = "t")]
    pub types_prefix: String,

    /// EWS messages namespace URI.
    #[arg(long, env = "EWS_MESSAGES_NAMESPACE", default_value = MESSAGES_NAMESPACE)]
    pub messages_namespace: String,

    /// Prefix for the EWS messages namespace.
    #[arg(long, env = "EWS_MESSAGES_PREFIX", default_value = "m")]
    pub messages_prefix: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "EWS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Indent the generated XML.
    #[arg(long, env = "EWS_PRETTY", default_value = "false")]
    pub pretty: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            soap_namespace: SOAP_ENVELOPE_NAMESPACE.to_string(),
            soap_prefix: "soapenv".to_string(),
            types_namespace: TYPES_NAMESPACE.to_string(),
            types_prefix: "t".to_string(),
            messages_namespace: MESSAGES_NAMESPACE.to_string(),
            messages_prefix: "m".to_string(),
            log_level: "info".to_string(),
            pretty: false,
        }
    }
}

impl ConnectorConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::try_parse_from(["ews-connector"]).unwrap_or_default()
    }

    /// Returns the namespaces requests are built with.
    pub fn namespaces(&self) -> Namespaces {
        Namespaces {
            soap: Namespace::new(&self.soap_namespace, &self.soap_prefix),
            types: Namespace::new(&self.types_namespace, &self.types_prefix),
            messages: Namespace::new(&self.messages_namespace, &self.messages_prefix),
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let namespaces = self.namespaces();

        for (label, namespace) in [
            ("SOAP", &namespaces.soap),
            ("types", &namespaces.types),
            ("messages", &namespaces.messages),
        ] {
            if namespace.prefix.is_empty() {
                errors.push(format!("{} namespace prefix cannot be empty", label));
            } else if let Err(e) = NamespaceNormalizer::new(namespace.clone()) {
                errors.push(format!("{} namespace: {}", label, e));
            }
        }

        if namespaces.soap.prefix == namespaces.types.prefix
            || namespaces.soap.prefix == namespaces.messages.prefix
            || namespaces.types.prefix == namespaces.messages.prefix
        {
            errors.push("Namespace prefixes must be distinct".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// The three namespaces of an EWS request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    /// SOAP envelope namespace.
    pub soap: Namespace,
    /// EWS types namespace, the default for request fields.
    pub types: Namespace,
    /// EWS messages namespace, used for operation elements.
    pub messages: Namespace,
}

impl Default for Namespaces {
    fn default() -> Self {
        ConnectorConfig::default().namespaces()
    }
}

/// Everything a request builder needs besides the parameters: the
/// namespaces and the validated rewrite rule into the types namespace.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    namespaces: Namespaces,
    normalizer: NamespaceNormalizer,
}

impl RequestSettings {
    /// Creates settings for the given namespaces.
    ///
    /// Fails with [`ConnectorError::Transform`] if the types namespace
    /// cannot serve as a rewrite target.
    pub fn new(namespaces: Namespaces) -> Result<Self> {
        let normalizer = NamespaceNormalizer::new(namespaces.types.clone())
            .map_err(|source| ConnectorError::Transform { source })?;
        Ok(Self {
            namespaces,
            normalizer,
        })
    }

    /// Creates settings from a configuration.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        Self::new(config.namespaces())
    }

    /// The namespaces requests are built with.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// The rewrite rule into the types namespace.
    pub fn normalizer(&self) -> &NamespaceNormalizer {
        &self.normalizer
    }
}
