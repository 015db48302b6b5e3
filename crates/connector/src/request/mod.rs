//! Request builders.
//!
//! A request builder turns one parameter set into a complete SOAP envelope:
//! it runs its header steps, builds the operation element for the body and
//! wraps both. Builders hold their [`RequestSettings`] and keep no other
//! state, so one builder can serve any number of requests.

mod envelope;
mod find_item;
mod send_item;

pub use envelope::Envelope;
pub use find_item::FindItemRequest;
pub use send_item::SendItemRequest;

use crate::config::RequestSettings;
use crate::error::Result;
use crate::header::{HeaderStep, build_header};
use crate::parameters::ParameterSource;
use crate::populate::FieldPopulator;
use clap::ValueEnum;
use ews_xml::XmlElement;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Builds the SOAP envelope of one EWS operation.
pub trait RequestBuilder {
    /// The operation element name, e.g. `FindItem`.
    fn operation(&self) -> &'static str;

    /// The settings the builder was created with.
    fn settings(&self) -> &RequestSettings;

    /// The header steps this operation runs, in order.
    fn header_steps(&self) -> &'static [HeaderStep];

    /// Builds the operation element placed in the SOAP body.
    fn build_body(&self, populator: &FieldPopulator<'_>) -> Result<XmlElement>;

    /// Builds the whole envelope from `params`.
    fn build(&self, params: &dyn ParameterSource) -> Result<Envelope> {
        let settings = self.settings();
        let populator = FieldPopulator::new(params, settings);

        debug!(operation = self.operation(), "building request");
        let header = build_header(&populator, self.header_steps())?;
        let request = self.build_body(&populator)?;
        Ok(Envelope::new(settings.namespaces(), header, request))
    }
}

/// The operations a builder exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Operation {
    /// Search a folder for items.
    FindItem,
    /// Send existing items.
    SendItem,
}

impl Operation {
    /// The EWS element name of the operation.
    pub fn element_name(self) -> &'static str {
        match self {
            Operation::FindItem => "FindItem",
            Operation::SendItem => "SendItem",
        }
    }

    /// Creates the builder for this operation.
    pub fn builder(self, settings: RequestSettings) -> Box<dyn RequestBuilder + Send + Sync> {
        match self {
            Operation::FindItem => Box::new(FindItemRequest::new(settings)),
            Operation::SendItem => Box::new(SendItemRequest::new(settings)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// An operation name that is not supported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation '{0}', expected FindItem or SendItem")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Accepts the element name or its kebab-case form, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "finditem" => Ok(Operation::FindItem),
            "senditem" => Ok(Operation::SendItem),
            _ => Err(UnknownOperation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Namespaces;
    use crate::parameters::Parameters;

    #[test]
    fn test_operation_from_str() {
        assert_eq!("FindItem".parse::<Operation>(), Ok(Operation::FindItem));
        assert_eq!("find-item".parse::<Operation>(), Ok(Operation::FindItem));
        assert_eq!("SEND_ITEM".parse::<Operation>(), Ok(Operation::SendItem));
        assert_eq!(
            "GetItem".parse::<Operation>(),
            Err(UnknownOperation("GetItem".to_string()))
        );
    }

    #[test]
    fn test_operation_builder_matches_operation() -> Result<()> {
        let settings = RequestSettings::new(Namespaces::default())?;
        for operation in [Operation::FindItem, Operation::SendItem] {
            let builder = operation.builder(settings.clone());
            assert_eq!(builder.operation(), operation.element_name());

            let envelope = builder.build(&Parameters::new())?;
            assert_eq!(
                envelope.request().map(|r| r.name.as_str()),
                Some(operation.element_name())
            );
        }
        Ok(())
    }
}
