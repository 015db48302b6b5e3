//! `SendItem` request assembly.

use super::RequestBuilder;
use crate::config::RequestSettings;
use crate::error::Result;
use crate::header::HeaderStep;
use crate::ids::{item_ids, saved_item_folder_id};
use crate::parameters::params;
use crate::populate::FieldPopulator;
use ews_xml::XmlElement;
use tracing::{debug, warn};

const HEADER_STEPS: &[HeaderStep] = &[
    HeaderStep::RequestServerVersion,
    HeaderStep::MailboxCulture,
    HeaderStep::ExchangeImpersonation,
];

/// Builds `SendItem` requests.
///
/// `ItemIds` is only considered when `SaveItemToFolder` was supplied, and
/// `SavedItemFolderId` only appears if one of the folder references did.
#[derive(Debug, Clone)]
pub struct SendItemRequest {
    settings: RequestSettings,
}

impl SendItemRequest {
    /// Creates a builder.
    pub fn new(settings: RequestSettings) -> Self {
        Self { settings }
    }
}

impl RequestBuilder for SendItemRequest {
    fn operation(&self) -> &'static str {
        "SendItem"
    }

    fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    fn header_steps(&self) -> &'static [HeaderStep] {
        HEADER_STEPS
    }

    fn build_body(&self, populator: &FieldPopulator<'_>) -> Result<XmlElement> {
        let mut send_item = populator.messages_element("SendItem");

        if populator.attribute(&mut send_item, params::SAVE_ITEM_TO_FOLDER, "SaveItemToFolder")
            && !item_ids(populator)?.attach_to(&mut send_item)
        {
            warn!("SaveItemToFolder is set but no item id parameter was supplied");
        }
        saved_item_folder_id(populator)?.attach_to(&mut send_item);

        debug!(children = send_item.children.len(), "assembled SendItem body");
        Ok(send_item)
    }
}
