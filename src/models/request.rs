//! Request record models.
//!
//! A [`RequestRecord`] is owned by the external document store. Lists in this
//! crate hold copies of records for display and never write them back except
//! through the store client.

use serde::{Deserialize, Serialize};

/// Prefix of store-internal documents that must never be rendered.
pub const DESIGN_DOC_PREFIX: &str = "_design";

/// A request record as delivered by the store.
///
/// Timestamps are epoch milliseconds. History records carry `midnight`, the
/// store-computed start of the local day the request was made on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Stable identifier, unique within one store.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name. History records usually have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Target URL.
    #[serde(default)]
    pub url: String,

    /// HTTP method as stored.
    #[serde(default)]
    pub method: String,

    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,

    /// Start of the record's local day. Trusted as given, never recomputed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midnight: Option<i64>,

    /// Projects this request belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,

    /// Single project id used by records created before multi-project support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_project: Option<String>,

    /// Position within a project for records created before projects kept an
    /// explicit request order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_order: Option<i64>,
}

impl RequestRecord {
    /// Creates a record with the given id, method and URL.
    pub fn new(id: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets `updated` and the day bucket together.
    pub fn with_times(mut self, updated: i64, midnight: i64) -> Self {
        self.updated = Some(updated);
        self.midnight = Some(midnight);
        self
    }

    /// Adds a project membership.
    pub fn in_project(mut self, project_id: impl Into<String>) -> Self {
        self.projects.push(project_id.into());
        self
    }

    /// The timestamp used for ordering: `updated`, falling back to `created`.
    pub fn effective_timestamp(&self) -> Option<i64> {
        self.updated.or(self.created)
    }

    /// Whether this is a store-internal document rather than a request.
    pub fn is_design_document(&self) -> bool {
        self.id.starts_with(DESIGN_DOC_PREFIX)
    }
}
