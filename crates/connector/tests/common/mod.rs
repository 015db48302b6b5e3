//! Common test utilities for request assembly tests.
//!
//! - [`fixtures`] - Parameter sets and fragments
//! - [`assertions`] - Element tree assertions

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

use ews_connector::{Namespaces, RequestSettings};

/// Settings with the default EWS namespaces.
pub fn default_settings() -> RequestSettings {
    RequestSettings::new(Namespaces::default()).expect("default namespaces are valid")
}
