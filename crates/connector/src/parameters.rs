//! Parameter lookup.
//!
//! The host pipeline hands every request a flat set of named string values.
//! Builders only ever read from it, through [`ParameterSource`]. Numeric and
//! boolean fields are carried as their literal text and are only checked for
//! presence.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::Path;

/// Read-only access to the parameters of one request.
pub trait ParameterSource {
    /// Returns the raw value of a parameter, if it was supplied.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// Returns the value if it is present and not blank.
    fn value(&self, name: &str) -> Option<&str> {
        non_empty(self.lookup(name))
    }

    /// Returns the value if it is present and not the empty string.
    ///
    /// Unlike [`ParameterSource::value`], whitespace-only values count as
    /// present.
    fn value_strict(&self, name: &str) -> Option<&str> {
        non_empty_strict(self.lookup(name))
    }
}

/// Treats absent, empty and whitespace-only values as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treats only absent and empty values as absent.
pub fn non_empty_strict(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl<S: BuildHasher> ParameterSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl ParameterSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// An owned parameter set, loadable from a JSON object.
///
/// String values are taken as they are. Numbers and booleans become their
/// literal text, arrays and objects their JSON text, and `null` leaves the
/// parameter absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, JsonValue>")]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`Parameters::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Number of parameters supplied.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no parameter was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Parses a JSON object into a parameter set.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads a JSON object from a file into a parameter set.
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(std::io::Error::from)
    }
}

impl ParameterSource for Parameters {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl From<BTreeMap<String, JsonValue>> for Parameters {
    fn from(map: BTreeMap<String, JsonValue>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    JsonValue::Null => return None,
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                Some((name, text))
            })
            .collect();
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { values }
    }
}

impl<K, V> Extend<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Names of the parameters read by the request builders.
pub mod params {
    // SOAP header fields
    /// User role list for the management role header (XML fragment).
    pub const USER_ROLES: &str = "UserRoles";
    /// Application role list for the management role header (XML fragment).
    pub const APPLICATION_ROLES: &str = "ApplicationRoles";
    /// Date/time precision header value.
    pub const DATE_TIME_PRECISION: &str = "DateTimePrecision";
    /// Time zone definition carrying `Id` and `Name` (XML fragment).
    pub const TIME_ZONE_DEFINITION: &str = "TimeZoneDefinition";
    /// Time zone periods (XML fragment).
    pub const PERIODS: &str = "Periods";
    /// Time zone transition groups (XML fragment).
    pub const TRANSITIONS_GROUPS: &str = "TransitionsGroups";
    /// Time zone transitions (XML fragment).
    pub const TRANSITIONS: &str = "Transitions";
    /// Requested server version, e.g. `Exchange2010_SP2`.
    pub const REQUEST_SERVER_VERSION: &str = "RequestServerVersion";
    /// Mailbox culture, e.g. `en-US`.
    pub const MAILBOX_CULTURE: &str = "MailboxCulture";
    /// Impersonated user principal name.
    pub const PRINCIPAL_NAME: &str = "PrincipalName";
    /// Impersonated user security identifier.
    pub const SID: &str = "SID";
    /// Impersonated user primary SMTP address.
    pub const PRIMARY_SMTP_ADDRESS: &str = "PrimarySmtpAddress";
    /// Impersonated user SMTP address.
    pub const SMTP_ADDRESS: &str = "SmtpAddress";

    // FindItem body fields
    /// FindItem traversal mode.
    pub const TRAVERSAL: &str = "Traversal";
    /// Item shape base shape.
    pub const BASE_SHAPE: &str = "BaseShape";
    /// Item shape MIME content flag.
    pub const INCLUDE_MIME_CONTENT: &str = "IncludeMimeContent";
    /// Item shape body type.
    pub const BODY_TYPE: &str = "BodyType";
    /// Item shape unique body type.
    pub const UNIQUE_BODY_TYPE: &str = "UniqueBodyType";
    /// Item shape normalized body type.
    pub const NORMALIZED_BODY_TYPE: &str = "NormalizedBodyType";
    /// Item shape HTML filtering flag.
    pub const FILTER_HTML_CONTENT: &str = "FilterHtmlContent";
    /// Item shape UTF-8 conversion flag.
    pub const CONVERT_HTML_CODE_PAGE_TO_UTF8: &str = "ConvertHtmlCodePageToUTF8";
    /// Item shape inline image URL template.
    pub const INLINE_IMAGE_URL_TEMPLATE: &str = "InlineImageUrlTemplate";
    /// Item shape blank target flag.
    pub const ADD_BLANK_TARGET_TO_LINKS: &str = "AddBlankTargetToLinks";
    /// Item shape maximum body size.
    pub const MAXIMUM_BODY_SIZE: &str = "MaximumBodySize";
    /// Item shape additional properties (XML fragment).
    pub const ADDITIONAL_PROPERTIES: &str = "AdditionalProperties";
    /// Indexed paging view (XML fragment).
    pub const INDEXED_PAGE_ITEM_VIEW: &str = "IndexedPageItemView";
    /// Fractional paging view (XML fragment).
    pub const FRACTIONAL_PAGE_ITEM_VIEW: &str = "FractionalPageItemView";
    /// Seek-to-condition paging view (XML fragment).
    pub const SEEK_TO_CONDITION_PAGE_ITEM_VIEW: &str = "SeekToConditionPageItemView";
    /// Calendar view (XML fragment).
    pub const CALENDAR_VIEW: &str = "CalendarView";
    /// Contacts view (XML fragment).
    pub const CONTACTS_VIEW: &str = "ContactsView";
    /// Grouping (XML fragment).
    pub const GROUP_BY: &str = "GroupBy";
    /// Distinguished grouping (XML fragment).
    pub const DISTINGUISHED_GROUP_BY: &str = "DistinguishedGroupBy";
    /// Search restriction (XML fragment).
    pub const RESTRICTION: &str = "Restriction";
    /// Sort order (XML fragment).
    pub const SORT_ORDER: &str = "SortOrder";
    /// Folders to search (XML fragment).
    pub const PARENT_FOLDER_IDS: &str = "ParentFolderIds";
    /// Query string (XML fragment).
    pub const QUERY_STRING: &str = "QueryString";

    // SendItem body fields
    /// Whether a copy of the sent item is saved.
    pub const SAVE_ITEM_TO_FOLDER: &str = "SaveItemToFolder";
    /// Item id with `Id` and `ChangeKey` (XML fragment).
    pub const ITEM_ID: &str = "ItemId";
    /// Occurrence item id (XML fragment).
    pub const OCCURRENCE_ITEM_ID: &str = "OccurrenceItemId";
    /// Recurring master item id (XML fragment).
    pub const RECURRING_MASTER_ITEM_ID: &str = "RecurringMasterItemId";
    /// Recurring master item id ranges (XML fragment).
    pub const RECURRING_MASTER_ITEM_ID_RANGES: &str = "RecurringMasterItemIdRanges";
    /// Target folder id with `Id` and `ChangeKey` (XML fragment).
    pub const FOLDER_ID: &str = "FolderId";
    /// Distinguished target folder (XML fragment).
    pub const DISTINGUISHED_FOLDER_ID: &str = "DistinguishedFolderId";
    /// Mailbox of the distinguished folder (XML fragment).
    pub const MAILBOX: &str = "Mailbox";
    /// Target address list id.
    pub const ADDRESS_LIST_ID: &str = "AddressListId";
}
