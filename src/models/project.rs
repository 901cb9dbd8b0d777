//! Project record model.

use serde::{Deserialize, Serialize};

/// A project as stored in the project store.
///
/// `requests` is the persisted display order of the project's member
/// requests. Projects created by older clients have no order at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable identifier.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Preferred order of member request ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<Vec<String>>,

    /// Position of the project among other projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Project {
    /// Creates a project without a recorded request order.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            requests: None,
            order: None,
        }
    }

    /// Sets the recorded request order.
    pub fn with_order<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.requests = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}
