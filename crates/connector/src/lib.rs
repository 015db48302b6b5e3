//! # ews-connector - EWS SOAP Request Assembly
//!
//! This crate turns a flat set of named string parameters into complete
//! Exchange Web Services SOAP 1.1 request envelopes. It is meant to sit in a
//! message-mediation pipeline: the host hands over the parameters of one
//! message, the connector builds the envelope and stores it back on the
//! message.
//!
//! ## Features
//!
//! - **FindItem and SendItem**: Request builders for both operations, with
//!   every optional header and body field supported
//! - **Absence Transparency**: Missing or blank parameters simply leave the
//!   corresponding element out
//! - **Fragment Parameters**: Structured fields are passed as XML fragments
//!   and rewritten into the EWS types namespace
//! - **Configurable Namespaces**: Namespace URIs and prefixes are settings,
//!   not constants
//!
//! ## Quick Start
//!
//! ```rust
//! use ews_connector::{FindItemRequest, Parameters, RequestBuilder, RequestSettings, Namespaces};
//!
//! let settings = RequestSettings::new(Namespaces::default())?;
//! let builder = FindItemRequest::new(settings);
//!
//! let params = Parameters::new()
//!     .with("Traversal", "Shallow")
//!     .with("BaseShape", "IdOnly");
//! let envelope = builder.build(&params)?;
//!
//! let xml = envelope.to_xml_string(false)?;
//! assert!(xml.contains(r#"<m:FindItem Traversal="Shallow">"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Hosting
//!
//! Hosts implement [`MessageContext`] on their message type and call
//! [`connect`]. Failures are logged with their category and returned as a
//! [`ConnectorError`]; the message is only modified on success.
//!
//! ## Parameters
//!
//! Parameter names are listed in [`parameters::params`]. Values are either
//! scalars, which become attributes or element text, or XML fragments,
//! which are parsed and attached as subtrees.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod header;
pub mod ids;
pub mod parameters;
pub mod populate;
pub mod request;

pub use config::{ConnectorConfig, Namespaces, RequestSettings};
pub use context::{InMemoryContext, MessageContext, connect};
pub use error::{BoxError, ConnectorError, Result};
pub use header::HeaderStep;
pub use ids::Populated;
pub use parameters::{ParameterSource, Parameters};
pub use populate::FieldPopulator;
pub use request::{
    Envelope, FindItemRequest, Operation, RequestBuilder, SendItemRequest, UnknownOperation,
};

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ews_connector={},ews_xml={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
