//! SOAP header assembly.
//!
//! The header is a sequence of independent steps. Each step builds one EWS
//! header element from the parameters and appends it to the header only if
//! the element ended up with content. Operations choose which steps they run
//! and in which order.

use crate::error::Result;
use crate::ids::{Populated, fragment_field};
use crate::parameters::params;
use crate::populate::FieldPopulator;
use ews_xml::XmlElement;
use std::fmt;
use tracing::{debug, trace};

/// One header element an operation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderStep {
    /// `ManagementRole` with user and application roles.
    ManagementRole,
    /// `DateTimePrecision`.
    DateTimePrecision,
    /// `TimeZoneContext` wrapping a time zone definition.
    TimeZoneContext,
    /// `RequestServerVersion`.
    RequestServerVersion,
    /// `MailboxCulture`.
    MailboxCulture,
    /// `ExchangeImpersonation` with the connecting SID.
    ExchangeImpersonation,
}

impl HeaderStep {
    /// Every step, in the order FindItem applies them.
    pub const ALL: &'static [HeaderStep] = &[
        HeaderStep::ManagementRole,
        HeaderStep::DateTimePrecision,
        HeaderStep::TimeZoneContext,
        HeaderStep::RequestServerVersion,
        HeaderStep::MailboxCulture,
        HeaderStep::ExchangeImpersonation,
    ];

    /// The local name of the element this step produces.
    pub fn element_name(self) -> &'static str {
        match self {
            HeaderStep::ManagementRole => "ManagementRole",
            HeaderStep::DateTimePrecision => "DateTimePrecision",
            HeaderStep::TimeZoneContext => "TimeZoneContext",
            HeaderStep::RequestServerVersion => "RequestServerVersion",
            HeaderStep::MailboxCulture => "MailboxCulture",
            HeaderStep::ExchangeImpersonation => "ExchangeImpersonation",
        }
    }

    /// Builds this step's element without attaching it.
    pub fn build(self, populator: &FieldPopulator<'_>) -> Result<Populated> {
        match self {
            HeaderStep::ManagementRole => management_role(populator),
            HeaderStep::DateTimePrecision => Ok(date_time_precision(populator)),
            HeaderStep::TimeZoneContext => time_zone_context(populator),
            HeaderStep::RequestServerVersion => Ok(request_server_version(populator)),
            HeaderStep::MailboxCulture => Ok(mailbox_culture(populator)),
            HeaderStep::ExchangeImpersonation => Ok(exchange_impersonation(populator)),
        }
    }

    /// Builds this step's element and appends it to `header` if populated.
    ///
    /// Returns true if an element was appended.
    pub fn apply(self, populator: &FieldPopulator<'_>, header: &mut XmlElement) -> Result<bool> {
        let attached = self.build(populator)?.attach_to(header);
        trace!(step = %self, attached, "applied header step");
        Ok(attached)
    }
}

impl fmt::Display for HeaderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Builds a SOAP `Header` by running `steps` in order.
pub fn build_header(populator: &FieldPopulator<'_>, steps: &[HeaderStep]) -> Result<XmlElement> {
    let mut header = XmlElement::qualified("Header", &populator.namespaces().soap);
    for step in steps {
        step.apply(populator, &mut header)?;
    }
    debug!(elements = header.children.len(), "assembled SOAP header");
    Ok(header)
}

fn populated_if_children(element: XmlElement) -> Populated {
    let populated = element.has_children();
    Populated::new(element, populated)
}

/// `ManagementRole` with `UserRoles` and `ApplicationRoles` fragments.
pub fn management_role(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut role = populator.types_element("ManagementRole");
    populator.direct_element(&mut role, params::USER_ROLES)?;
    populator.direct_element(&mut role, params::APPLICATION_ROLES)?;
    Ok(populated_if_children(role))
}

/// `DateTimePrecision` text. Only an empty string counts as absent here.
pub fn date_time_precision(populator: &FieldPopulator<'_>) -> Populated {
    let mut precision = populator.types_element("DateTimePrecision");
    let populated = match populator.params().value_strict(params::DATE_TIME_PRECISION) {
        Some(value) => {
            precision.set_text(value);
            true
        }
        None => false,
    };
    Populated::new(precision, populated)
}

/// `TimeZoneContext` wrapping a `TimeZoneDefinition`.
pub fn time_zone_context(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut context = populator.types_element("TimeZoneContext");
    time_zone_definition(populator)?.attach_to(&mut context);
    Ok(populated_if_children(context))
}

/// `TimeZoneDefinition` with optional `Id` and `Name` attributes taken from
/// the definition fragment and the `Periods`, `TransitionsGroups` and
/// `Transitions` fragments as children.
pub fn time_zone_definition(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut definition = populator.types_element("TimeZoneDefinition");

    if let Some(fragment) = populator.fragment(params::TIME_ZONE_DEFINITION)? {
        for field in ["Id", "Name"] {
            if let Some(value) = fragment_field(&fragment, field) {
                definition.set_attribute(field, value);
            }
        }
    }
    populator.direct_element(&mut definition, params::PERIODS)?;
    populator.direct_element(&mut definition, params::TRANSITIONS_GROUPS)?;
    populator.direct_element(&mut definition, params::TRANSITIONS)?;

    let populated = definition.has_children() || definition.has_attributes();
    Ok(Populated::new(definition, populated))
}

/// `RequestServerVersion` with its `Version` attribute.
pub fn request_server_version(populator: &FieldPopulator<'_>) -> Populated {
    let mut version = populator.types_element("RequestServerVersion");
    let populated = populator.attribute(&mut version, params::REQUEST_SERVER_VERSION, "Version");
    Populated::new(version, populated)
}

/// `MailboxCulture` text.
pub fn mailbox_culture(populator: &FieldPopulator<'_>) -> Populated {
    let mut culture = populator.types_element("MailboxCulture");
    let populated = populator.text(&mut culture, params::MAILBOX_CULTURE);
    Populated::new(culture, populated)
}

/// `ExchangeImpersonation` wrapping a `ConnectingSID` with any of the four
/// account identifiers.
pub fn exchange_impersonation(populator: &FieldPopulator<'_>) -> Populated {
    let mut sid = populator.types_element("ConnectingSID");
    for (parameter, name) in [
        (params::PRINCIPAL_NAME, "PrincipalName"),
        (params::SID, "SID"),
        (params::PRIMARY_SMTP_ADDRESS, "PrimarySmtpAddress"),
        (params::SMTP_ADDRESS, "SmtpAddress"),
    ] {
        populator.element(&mut sid, parameter, name);
    }

    let mut impersonation = populator.types_element("ExchangeImpersonation");
    populated_if_children(sid).attach_to(&mut impersonation);
    populated_if_children(impersonation)
}
