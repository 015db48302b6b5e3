//! `FindItem` request assembly.

use super::RequestBuilder;
use crate::config::RequestSettings;
use crate::error::Result;
use crate::header::HeaderStep;
use crate::parameters::params;
use crate::populate::FieldPopulator;
use ews_xml::XmlElement;
use tracing::debug;

/// Scalar `ItemShape` children, in schema order.
const SHAPE_FIELDS: &[&str] = &[
    params::BASE_SHAPE,
    params::INCLUDE_MIME_CONTENT,
    params::BODY_TYPE,
    params::UNIQUE_BODY_TYPE,
    params::NORMALIZED_BODY_TYPE,
    params::FILTER_HTML_CONTENT,
    params::CONVERT_HTML_CODE_PAGE_TO_UTF8,
    params::INLINE_IMAGE_URL_TEMPLATE,
    params::ADD_BLANK_TARGET_TO_LINKS,
    params::MAXIMUM_BODY_SIZE,
];

/// Fragments placed directly under `FindItem`, in schema order.
const BODY_FRAGMENTS: &[&str] = &[
    params::INDEXED_PAGE_ITEM_VIEW,
    params::FRACTIONAL_PAGE_ITEM_VIEW,
    params::SEEK_TO_CONDITION_PAGE_ITEM_VIEW,
    params::CALENDAR_VIEW,
    params::CONTACTS_VIEW,
    params::GROUP_BY,
    params::DISTINGUISHED_GROUP_BY,
    params::RESTRICTION,
    params::SORT_ORDER,
    params::PARENT_FOLDER_IDS,
    params::QUERY_STRING,
];

/// Builds `FindItem` requests.
///
/// The header carries every [`HeaderStep`]. The body holds the `Traversal`
/// attribute, an `ItemShape` that is always present, and any of the view,
/// grouping, restriction, sort, folder and query fragments supplied.
#[derive(Debug, Clone)]
pub struct FindItemRequest {
    settings: RequestSettings,
}

impl FindItemRequest {
    /// Creates a builder.
    pub fn new(settings: RequestSettings) -> Self {
        Self { settings }
    }

    fn item_shape(&self, populator: &FieldPopulator<'_>) -> Result<XmlElement> {
        let mut shape = populator.messages_element("ItemShape");
        for field in SHAPE_FIELDS {
            populator.element(&mut shape, field, field);
        }
        populator.direct_element(&mut shape, params::ADDITIONAL_PROPERTIES)?;
        Ok(shape)
    }
}

impl RequestBuilder for FindItemRequest {
    fn operation(&self) -> &'static str {
        "FindItem"
    }

    fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    fn header_steps(&self) -> &'static [HeaderStep] {
        HeaderStep::ALL
    }

    fn build_body(&self, populator: &FieldPopulator<'_>) -> Result<XmlElement> {
        let messages = &populator.namespaces().messages;
        let mut find_item = populator.messages_element("FindItem");

        populator.attribute(&mut find_item, params::TRAVERSAL, "Traversal");
        find_item.add_child(self.item_shape(populator)?);

        for parameter in BODY_FRAGMENTS {
            populator.direct_element_in(&mut find_item, parameter, messages)?;
        }

        debug!(children = find_item.children.len(), "assembled FindItem body");
        Ok(find_item)
    }
}
