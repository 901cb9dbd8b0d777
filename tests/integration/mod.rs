//! Shared infrastructure for request list integration tests.
//!
//! [`MemoryStore`] is an in-memory store client that publishes change
//! notifications the way a real store does, so lists can be driven end to
//! end without a database.

pub mod history_test;
pub mod saved_test;

use async_trait::async_trait;
use request_lists::{
    ChangeNotification, ChangeRecord, DeletedRecord, ListMode, ListResponse, NotificationBus,
    PageRequest, Project, RequestRecord, StoreClient, StoreError, StoreKind,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// 2023-11-14T22:13:20Z
pub const NOW: i64 = 1_700_000_000_000;

/// UTC midnight of [`NOW`].
pub const TODAY: i64 = 1_699_920_000_000;

pub const DAY: i64 = 86_400_000;

#[derive(Default)]
struct Documents {
    history: Vec<RequestRecord>,
    saved: Vec<RequestRecord>,
    projects: Vec<Project>,
    trash: HashMap<(StoreKind, String), RequestRecord>,
}

impl Documents {
    fn records(&mut self, kind: StoreKind) -> &mut Vec<RequestRecord> {
        match kind {
            StoreKind::History => &mut self.history,
            StoreKind::Saved => &mut self.saved,
        }
    }
}

/// In-memory store client.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
    bus: NotificationBus,
    failing: AtomicBool,
    list_calls: Mutex<Vec<PageRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(self, records: Vec<RequestRecord>) -> Self {
        self.documents.lock().unwrap().history = records;
        self
    }

    pub fn with_saved(self, records: Vec<RequestRecord>) -> Self {
        self.documents.lock().unwrap().saved = records;
        self
    }

    pub fn with_project(self, project: Project) -> Self {
        self.documents.lock().unwrap().projects.push(project);
        self
    }

    /// Bus on which the store publishes its changes.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Makes every following call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> Vec<PageRequest> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn stored_project(&self, id: &str) -> Option<Project> {
        let documents = self.documents.lock().unwrap();
        documents.projects.iter().find(|p| p.id == id).cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Rejected("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn upsert(records: &mut Vec<RequestRecord>, record: RequestRecord) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn list(&self, mode: ListMode, page: PageRequest) -> Result<ListResponse, StoreError> {
        self.check()?;
        self.list_calls.lock().unwrap().push(page.clone());

        let mut documents = self.documents.lock().unwrap();
        let records = documents.records(mode.store_kind());
        let offset: usize = page
            .next_page_token
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let end = (offset + page.limit).min(records.len());
        let items = records.get(offset..end).unwrap_or_default().to_vec();
        // Like a key-ordered database, the token always points past the
        // last returned record, even on the final page.
        let next_page_token = Some(end.max(offset).to_string());
        Ok(ListResponse {
            items,
            next_page_token,
        })
    }

    async fn query(
        &self,
        term: &str,
        mode: ListMode,
        detailed: bool,
    ) -> Result<Vec<RequestRecord>, StoreError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap();
        Ok(documents
            .records(mode.store_kind())
            .iter()
            .filter(|r| {
                r.url.to_lowercase().contains(term)
                    || (detailed
                        && r.name
                            .as_deref()
                            .is_some_and(|n| n.to_lowercase().contains(term)))
            })
            .cloned()
            .collect())
    }

    async fn read(&self, kind: StoreKind, id: &str) -> Result<RequestRecord, StoreError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap();
        documents
            .records(kind)
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(
        &self,
        kind: StoreKind,
        record: RequestRecord,
    ) -> Result<ChangeRecord<RequestRecord>, StoreError> {
        self.check()?;
        upsert(self.documents.lock().unwrap().records(kind), record.clone());
        let change = ChangeRecord::with_item(record.id.clone(), record);
        self.bus.publish(ChangeNotification::RequestUpdated {
            kind,
            change: change.clone(),
        });
        Ok(change)
    }

    async fn update_bulk(
        &self,
        kind: StoreKind,
        records: Vec<RequestRecord>,
    ) -> Result<Vec<ChangeRecord<RequestRecord>>, StoreError> {
        let mut changes = Vec::with_capacity(records.len());
        for record in records {
            changes.push(self.update(kind, record).await?);
        }
        Ok(changes)
    }

    async fn delete_bulk(
        &self,
        kind: StoreKind,
        ids: Vec<String>,
    ) -> Result<Vec<DeletedRecord>, StoreError> {
        self.check()?;
        let mut deleted = Vec::new();
        {
            let mut documents = self.documents.lock().unwrap();
            for id in ids {
                let records = documents.records(kind);
                if let Some(index) = records.iter().position(|r| r.id == id) {
                    let record = records.remove(index);
                    documents.trash.insert((kind, id.clone()), record);
                    deleted.push(DeletedRecord {
                        id,
                        rev: Some("2-deleted".to_string()),
                    });
                }
            }
        }
        for record in &deleted {
            self.bus.publish(ChangeNotification::RequestDeleted {
                kind,
                id: record.id.clone(),
            });
        }
        Ok(deleted)
    }

    async fn undelete_bulk(
        &self,
        kind: StoreKind,
        deleted: Vec<DeletedRecord>,
    ) -> Result<Vec<ChangeRecord<RequestRecord>>, StoreError> {
        self.check()?;
        let mut documents = self.documents.lock().unwrap();
        let mut restored = Vec::new();
        for record in deleted {
            if let Some(original) = documents.trash.remove(&(kind, record.id.clone())) {
                upsert(documents.records(kind), original.clone());
                restored.push(ChangeRecord::with_item(record.id, original));
            }
        }
        Ok(restored)
    }

    async fn read_project(&self, id: &str) -> Result<Project, StoreError> {
        self.check()?;
        self.stored_project(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_project(&self, project: Project) -> Result<ChangeRecord<Project>, StoreError> {
        self.check()?;
        {
            let mut documents = self.documents.lock().unwrap();
            match documents.projects.iter_mut().find(|p| p.id == project.id) {
                Some(existing) => *existing = project.clone(),
                None => documents.projects.push(project.clone()),
            }
        }
        let change = ChangeRecord::with_item(project.id.clone(), project);
        self.bus
            .publish(ChangeNotification::ProjectUpdated(change.clone()));
        Ok(change)
    }

    async fn project_requests(&self, project_id: &str) -> Result<Vec<RequestRecord>, StoreError> {
        self.check()?;
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .saved
            .iter()
            .filter(|r| {
                r.projects.iter().any(|p| p == project_id)
                    || r.legacy_project.as_deref() == Some(project_id)
            })
            .cloned()
            .collect())
    }
}

/// A history record made at `updated` on the day starting at `midnight`.
pub fn history_record(id: &str, updated: i64, midnight: i64) -> RequestRecord {
    RequestRecord::new(id, "GET", format!("https://api.example.com/{}", id))
        .with_times(updated, midnight)
}

/// A saved record with an optional name.
pub fn saved_record(id: &str, name: Option<&str>) -> RequestRecord {
    let record = RequestRecord::new(id, "POST", format!("https://api.example.com/{}", id));
    match name {
        Some(name) => record.with_name(name),
        None => record,
    }
}

/// A saved record that belongs to `project_id`.
pub fn project_record(id: &str, project_id: &str) -> RequestRecord {
    saved_record(id, Some(id)).in_project(project_id)
}
