//! SendItem request assembly tests.

mod common;

use common::assertions::*;
use common::default_settings;
use common::fixtures;
use ews_connector::{ConnectorError, Parameters, RequestBuilder, SendItemRequest};

#[test]
fn test_save_to_folder_with_item_id() {
    let params = Parameters::new()
        .with("SaveItemToFolder", "true")
        .with("ItemId", fixtures::ITEM_ID);
    let envelope = SendItemRequest::new(default_settings())
        .build(&params)
        .expect("request builds");

    let xml = envelope.to_xml_string(false).expect("serializes");
    assert!(xml.contains(concat!(
        r#"<soapenv:Body><m:SendItem SaveItemToFolder="true">"#,
        r#"<m:ItemIds><t:ItemId Id="X" ChangeKey="Y"/></m:ItemIds>"#,
        "</m:SendItem></soapenv:Body>"
    )));
}

#[test]
fn test_folder_id_scenario() {
    let params = Parameters::new().with("FolderId", fixtures::FOLDER_ID);
    let envelope = SendItemRequest::new(default_settings())
        .build(&params)
        .expect("request builds");

    let send_item = envelope.request().expect("request element");
    assert_children(send_item, &["SavedItemFolderId"]);
    let container = &send_item.children[0];
    assert_children(container, &["FolderId"]);
    assert_attributes(&container.children[0], &[("Id", "AAA="), ("ChangeKey", "CK1")]);
}

#[test]
fn test_every_body_element() {
    let settings = default_settings();
    let params = Parameters::new()
        .with("SaveItemToFolder", "true")
        .with("ItemId", fixtures::ITEM_ID)
        .with(
            "OccurrenceItemId",
            "<OccurrenceItemId><RecurringMasterId>M</RecurringMasterId><ChangeKey>C</ChangeKey><InstanceIndex>3</InstanceIndex></OccurrenceItemId>",
        )
        .with("FolderId", fixtures::FOLDER_ID)
        .with("DistinguishedFolderId", r#"<DistinguishedFolderId Id="sentitems"/>"#)
        .with("Mailbox", "<Mailbox><EmailAddress>owner@example.com</EmailAddress></Mailbox>")
        .with("AddressListId", "AL-9");
    let envelope = SendItemRequest::new(settings.clone())
        .build(&params)
        .expect("request builds");

    let send_item = envelope.request().expect("request element");
    assert_children(send_item, &["ItemIds", "SavedItemFolderId"]);
    assert_children(&send_item.children[0], &["ItemId", "OccurrenceItemId"]);
    assert_children(
        &send_item.children[1],
        &["FolderId", "DistinguishedFolderId", "AddressListId"],
    );

    let distinguished = &send_item.children[1].children[1];
    assert_attributes(distinguished, &[("Id", "sentitems")]);
    assert_children(distinguished, &["Mailbox"]);
    assert_all_in_namespace(distinguished, &settings.namespaces().types);
    assert_no_empty_containers(envelope.root(), &["Header"]);
}

#[test]
fn test_header_has_send_item_steps_only() {
    let params = fixtures::full_header();
    let envelope = SendItemRequest::new(default_settings())
        .build(&params)
        .expect("request builds");

    assert_children(
        envelope.header(),
        &["RequestServerVersion", "MailboxCulture", "ExchangeImpersonation"],
    );
}

#[test]
fn test_empty_parameters_give_bare_send_item() {
    let envelope = SendItemRequest::new(default_settings())
        .build(&Parameters::new())
        .expect("request builds");

    let send_item = envelope.request().expect("request element");
    assert!(send_item.is_empty());
    assert!(!envelope.header().has_children());
}

#[test]
fn test_item_id_missing_change_key() {
    let params = Parameters::new()
        .with("SaveItemToFolder", "true")
        .with("ItemId", "<ItemId><Id>X</Id></ItemId>");
    let error = SendItemRequest::new(default_settings())
        .build(&params)
        .unwrap_err();

    assert_eq!(error.kind(), "validation");
    assert_eq!(
        error.to_string(),
        "parameter 'ItemId' is missing required field 'ChangeKey'"
    );
}

#[test]
fn test_malformed_mailbox_is_a_parse_error() {
    let params = Parameters::new().with("Mailbox", "<Mailbox><EmailAddress>");
    let error = SendItemRequest::new(default_settings())
        .build(&params)
        .unwrap_err();

    assert!(matches!(error, ConnectorError::Parse { ref parameter, .. } if parameter == "Mailbox"));
}
