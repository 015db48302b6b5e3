//! Composite identifier builders.
//!
//! Item and folder references are supplied as small XML fragments and
//! re-emitted as EWS id elements whose fields become attributes. A field is
//! read from the child element of that name or, failing that, from an
//! attribute of that name on the fragment root, so both
//! `<ItemId><Id>X</Id><ChangeKey>Y</ChangeKey></ItemId>` and
//! `<t:ItemId Id="X" ChangeKey="Y"/>` are accepted.

use crate::error::{ConnectorError, Result};
use crate::parameters::params;
use crate::populate::FieldPopulator;
use ews_xml::XmlElement;
use tracing::{debug, trace};

/// A container built speculatively, together with whether it got content.
///
/// Callers attach the element only when `populated` is true, which keeps
/// empty wrappers out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Populated {
    /// The built element.
    pub element: XmlElement,
    /// Whether anything was added to it.
    pub populated: bool,
}

impl Populated {
    /// Wraps an element with an explicit populated flag.
    pub fn new(element: XmlElement, populated: bool) -> Self {
        Self { element, populated }
    }

    /// Appends the element to `parent` if it was populated.
    ///
    /// Returns true if it was attached.
    pub fn attach_to(self, parent: &mut XmlElement) -> bool {
        if self.populated {
            parent.add_child(self.element);
        }
        self.populated
    }
}

/// Reads a named field of a fragment: child element text first, then the
/// attribute of the same name.
pub fn fragment_field<'f>(fragment: &'f XmlElement, name: &str) -> Option<&'f str> {
    match fragment.child(name) {
        Some(child) => Some(child.text().unwrap_or_default()),
        None => fragment.attribute(name),
    }
}

fn required_field<'f>(fragment: &'f XmlElement, parameter: &str, name: &str) -> Result<&'f str> {
    fragment_field(fragment, name).ok_or_else(|| ConnectorError::missing_field(parameter, name))
}

/// Builds `element_name` with one attribute per required field of the
/// fragment held by `parameter`. Returns `None` if the parameter is absent.
fn id_element(
    populator: &FieldPopulator<'_>,
    parameter: &str,
    element_name: &str,
    fields: &[&str],
) -> Result<Option<XmlElement>> {
    let Some(fragment) = populator.fragment(parameter)? else {
        return Ok(None);
    };

    let mut element = populator.types_element(element_name);
    for field in fields {
        element.set_attribute(*field, required_field(&fragment, parameter, field)?);
    }
    trace!(parameter, element = element_name, "built id element");
    Ok(Some(element))
}

/// Builds `ItemIds` from the four independent item reference parameters.
///
/// Each supplied variant contributes one child, in the order item id,
/// occurrence id, recurring master id, recurring master id ranges.
pub fn item_ids(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut item_ids = populator.messages_element("ItemIds");

    let simple = id_element(populator, params::ITEM_ID, "ItemId", &["Id", "ChangeKey"])?;
    let occurrence = id_element(
        populator,
        params::OCCURRENCE_ITEM_ID,
        "OccurrenceItemId",
        &["RecurringMasterId", "ChangeKey", "InstanceIndex"],
    )?;
    let recurring_master = id_element(
        populator,
        params::RECURRING_MASTER_ITEM_ID,
        "RecurringMasterItemId",
        &["OccurrenceId", "ChangeKey"],
    )?;
    let ranges = recurring_master_item_id_ranges(populator)?;

    for element in [simple, occurrence, recurring_master, ranges].into_iter().flatten() {
        item_ids.add_child(element);
    }

    let populated = item_ids.has_children();
    debug!(count = item_ids.children.len(), "assembled item ids");
    Ok(Populated::new(item_ids, populated))
}

fn recurring_master_item_id_ranges(populator: &FieldPopulator<'_>) -> Result<Option<XmlElement>> {
    let parameter = params::RECURRING_MASTER_ITEM_ID_RANGES;
    let Some(fragment) = populator.fragment(parameter)? else {
        return Ok(None);
    };

    let mut element = populator.types_element("RecurringMasterItemIdRanges");
    element.set_attribute("Id", required_field(&fragment, parameter, "Id")?);
    element.set_attribute("ChangeKey", required_field(&fragment, parameter, "ChangeKey")?);

    let mut ranges = fragment
        .child("Ranges")
        .cloned()
        .ok_or_else(|| ConnectorError::missing_field(parameter, "Ranges"))?;
    // Bindings from the fragment root stay in scope for the detached child.
    let inherited = fragment
        .namespace
        .iter()
        .filter(|namespace| !namespace.prefix.is_empty())
        .chain(&fragment.declarations);
    for namespace in inherited {
        if !ranges.declarations.iter().any(|d| d.prefix == namespace.prefix) {
            ranges.declare_namespace(namespace);
        }
    }
    element.add_child(populator.normalizer().normalize(ranges));
    Ok(Some(element))
}

/// Builds `SavedItemFolderId` from the three alternative folder references.
///
/// Each alternative is attached only if it produced content; the result is
/// populated if any of them was.
pub fn saved_item_folder_id(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut container = populator.messages_element("SavedItemFolderId");

    if let Some(folder_id) = id_element(populator, params::FOLDER_ID, "FolderId", &["Id", "ChangeKey"])? {
        container.add_child(folder_id);
    }
    distinguished_folder_id(populator)?.attach_to(&mut container);
    address_list_id(populator).attach_to(&mut container);

    let populated = container.has_children();
    Ok(Populated::new(container, populated))
}

/// Builds `DistinguishedFolderId`: optional `Id` and `ChangeKey` from the
/// fragment plus an optional `Mailbox` child.
pub fn distinguished_folder_id(populator: &FieldPopulator<'_>) -> Result<Populated> {
    let mut element = populator.types_element("DistinguishedFolderId");

    if let Some(fragment) = populator.fragment(params::DISTINGUISHED_FOLDER_ID)? {
        for field in ["Id", "ChangeKey"] {
            if let Some(value) = fragment_field(&fragment, field) {
                element.set_attribute(field, value);
            }
        }
    }
    populator.direct_element(&mut element, params::MAILBOX)?;

    let populated = element.has_children() || element.has_attributes();
    Ok(Populated::new(element, populated))
}

/// Builds `AddressListId` from a scalar id.
pub fn address_list_id(populator: &FieldPopulator<'_>) -> Populated {
    let mut element = populator.types_element("AddressListId");
    let populated = populator.attribute(&mut element, params::ADDRESS_LIST_ID, "Id");
    Populated::new(element, populated)
}
