//! Contract of the document store behind request lists.
//!
//! The store owns persistence, querying and pagination cursors. Lists only
//! cache what the store returns and never assume its ordering.

use crate::error::StoreError;
use crate::models::{ListMode, Project, RequestRecord, StoreKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters of a paginated list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Continuation token from the previous page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Maximum number of records to return.
    pub limit: usize,
}

/// One page of records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Records in store order.
    #[serde(default)]
    pub items: Vec<RequestRecord>,

    /// Token for the next page. Absent when the store has no more to give.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Outcome of a store write or a change notification.
///
/// Notifications may carry only the id; the list then reads the document
/// before reconciling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord<T> {
    /// Id of the changed document.
    pub id: String,

    /// Revision after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// The changed document, when the sender included it.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
}

impl<T> ChangeRecord<T> {
    /// A change record that carries only the document id.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            item: None,
        }
    }

    /// A change record carrying the changed document.
    pub fn with_item(id: impl Into<String>, item: T) -> Self {
        Self {
            id: id.into(),
            rev: None,
            item: Some(item),
        }
    }
}

/// A deleted document, as needed to restore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRecord {
    /// Id of the deleted document.
    pub id: String,

    /// Revision of the deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

/// Client of the request and project store.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Lists one page of records for `mode`.
    async fn list(&self, mode: ListMode, page: PageRequest) -> Result<ListResponse, StoreError>;

    /// Searches records of `mode`. `detailed` enables full-text search over
    /// request payloads.
    async fn query(
        &self,
        term: &str,
        mode: ListMode,
        detailed: bool,
    ) -> Result<Vec<RequestRecord>, StoreError>;

    /// Reads one record.
    async fn read(&self, kind: StoreKind, id: &str) -> Result<RequestRecord, StoreError>;

    /// Writes one record.
    async fn update(
        &self,
        kind: StoreKind,
        record: RequestRecord,
    ) -> Result<ChangeRecord<RequestRecord>, StoreError>;

    /// Writes several records.
    async fn update_bulk(
        &self,
        kind: StoreKind,
        records: Vec<RequestRecord>,
    ) -> Result<Vec<ChangeRecord<RequestRecord>>, StoreError>;

    /// Deletes records, returning what is needed to restore them.
    async fn delete_bulk(
        &self,
        kind: StoreKind,
        ids: Vec<String>,
    ) -> Result<Vec<DeletedRecord>, StoreError>;

    /// Restores deleted records.
    async fn undelete_bulk(
        &self,
        kind: StoreKind,
        deleted: Vec<DeletedRecord>,
    ) -> Result<Vec<ChangeRecord<RequestRecord>>, StoreError>;

    /// Reads a project.
    async fn read_project(&self, id: &str) -> Result<Project, StoreError>;

    /// Writes a project.
    async fn update_project(&self, project: Project) -> Result<ChangeRecord<Project>, StoreError>;

    /// Lists every saved request of a project.
    async fn project_requests(&self, project_id: &str) -> Result<Vec<RequestRecord>, StoreError>;
}
