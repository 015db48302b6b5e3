//! Parameter fixtures.

use ews_connector::Parameters;

/// A simple item id fragment in child-element form.
pub const ITEM_ID: &str = "<ItemId><Id>X</Id><ChangeKey>Y</ChangeKey></ItemId>";

/// A folder id fragment in attribute form, with an undeclared prefix.
pub const FOLDER_ID: &str = r#"<t:FolderId Id="AAA=" ChangeKey="CK1"/>"#;

/// A restriction written against a foreign namespace.
pub const RESTRICTION: &str = concat!(
    r#"<q:Restriction xmlns:q="urn:example:query">"#,
    r#"<q:IsEqualTo><q:FieldURI FieldURI="item:Subject"/>"#,
    r#"<q:FieldURIOrConstant><q:Constant Value="Q3 &amp; Q4"/></q:FieldURIOrConstant>"#,
    "</q:IsEqualTo></q:Restriction>"
);

/// A sort order fragment.
pub const SORT_ORDER: &str = concat!(
    "<SortOrder>",
    r#"<FieldOrder Order="Descending"><FieldURI FieldURI="item:DateTimeReceived"/></FieldOrder>"#,
    "</SortOrder>"
);

/// Parameters filling every FindItem header step.
pub fn full_header() -> Parameters {
    Parameters::new()
        .with("UserRoles", "<UserRoles><Role><Name>MailboxSearch</Name></Role></UserRoles>")
        .with("DateTimePrecision", "Milliseconds")
        .with("TimeZoneDefinition", r#"<TimeZoneDefinition Id="Eastern Standard Time"/>"#)
        .with("RequestServerVersion", "Exchange2013")
        .with("MailboxCulture", "en-US")
        .with("PrimarySmtpAddress", "delegate@example.com")
}

/// A typical inbox search, as name and value pairs.
pub const INBOX_SEARCH: &[(&str, &str)] = &[
    ("Traversal", "Shallow"),
    ("BaseShape", "IdOnly"),
    (
        "IndexedPageItemView",
        r#"<IndexedPageItemView MaxEntriesReturned="50" Offset="0" BasePoint="Beginning"/>"#,
    ),
    ("Restriction", RESTRICTION),
    ("SortOrder", SORT_ORDER),
    (
        "ParentFolderIds",
        r#"<ParentFolderIds><DistinguishedFolderId Id="inbox"/></ParentFolderIds>"#,
    ),
];

/// A typical inbox search.
pub fn inbox_search() -> Parameters {
    INBOX_SEARCH.iter().copied().collect()
}
