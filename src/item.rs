use serde::{Deserialize, Serialize};

use crate::form::resolve::EmptyValue;

/// The record carried by the `item` part.
///
/// Fields the payload does not know about are ignored on decode, and a missing `name` stays
/// absent, serialising as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name, if one was submitted.
    #[serde(default)]
    pub name: Option<String>,
}

impl EmptyValue for Item {
    fn empty() -> Self {
        Item { name: None }
    }
}
