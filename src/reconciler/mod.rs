//! Flat request list reconciliation.
//!
//! [`RequestListReconciler`] keeps the ordered list of records shown by saved
//! and project lists (and by history lists rendered without day groups). It
//! applies fetched batches and store change notifications while keeping each
//! mode's ordering rules:
//!
//! - **Saved**: sorted by name, unnamed records first.
//! - **Project**: the project's recorded request order, new members placed by
//!   that order or appended when the order does not know them.
//! - **History**: store order, most recently changed first for updates.
//!
//! Every operation tolerates ids that are no longer present. Store
//! notifications can arrive while a fetch is outstanding, so a missing id is
//! a no-op rather than an error.

use crate::layout::LayoutSignal;
use crate::models::{ListMode, Project, RequestRecord};
use crate::utils::{compare_by_saved_order, ids_equal_in_order, is_member_of_project};
use std::collections::HashMap;
use tracing::debug;

/// Result of applying a single updated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record replaced an existing entry at the same position.
    Replaced,
    /// The record was not listed and has been inserted.
    Inserted,
    /// The record left the project and has been removed.
    Removed,
    /// The record does not belong to this list.
    Ignored,
}

/// Ordered in-memory list of request records for one list mode.
#[derive(Debug, Clone)]
pub struct RequestListReconciler {
    mode: ListMode,
    items: Vec<RequestRecord>,
    project_id: Option<String>,
    order_snapshot: Option<Vec<String>>,
    layout: LayoutSignal,
}

impl RequestListReconciler {
    /// Creates an empty list for `mode`.
    pub fn new(mode: ListMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            project_id: None,
            order_snapshot: None,
            layout: LayoutSignal::default(),
        }
    }

    /// Creates an empty project list.
    pub fn for_project(project_id: impl Into<String>) -> Self {
        let mut reconciler = Self::new(ListMode::Project);
        reconciler.project_id = Some(project_id.into());
        reconciler
    }

    /// The list mode.
    pub fn mode(&self) -> ListMode {
        self.mode
    }

    /// Records in display order.
    pub fn items(&self) -> &[RequestRecord] {
        &self.items
    }

    /// Number of listed records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a record with `id` is listed.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    /// The project whose requests are listed, in project mode.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Sets the project whose requests are listed.
    pub fn set_project_id(&mut self, project_id: Option<String>) {
        self.project_id = project_id;
    }

    /// The last known project request order.
    pub fn order_snapshot(&self) -> Option<&[String]> {
        self.order_snapshot.as_deref()
    }

    /// Caches the request order of the last known project record.
    pub fn set_order_snapshot(&mut self, order: Option<Vec<String>>) {
        self.order_snapshot = order;
    }

    /// Caches the project's id and request order.
    pub fn set_project(&mut self, project: &Project) {
        self.project_id = Some(project.id.clone());
        self.order_snapshot = project.requests.clone();
    }

    /// Layout invalidation state.
    pub fn layout(&mut self) -> &mut LayoutSignal {
        &mut self.layout
    }

    /// Removes every record. The project id and order snapshot are kept.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.layout.invalidate();
        }
    }

    /// Adds a fetched batch of records.
    ///
    /// Returns the number of records that were added or refreshed. Saved lists
    /// skip store-internal documents, replace records already listed with the
    /// newer copy and re-sort by name. Project lists keep only members of the
    /// project and place them by the project order. Project lists without a
    /// project id ignore the batch.
    pub fn apply_insert_batch<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let applied = match self.mode {
            ListMode::Saved => self.insert_saved(records),
            ListMode::Project => self.insert_project(records),
            ListMode::History => self.insert_history(records),
        };
        if applied > 0 {
            self.layout.invalidate();
        }
        applied
    }

    fn insert_saved<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let mut applied = 0;
        for record in records {
            if record.is_design_document() {
                continue;
            }
            match self.position_of(&record.id) {
                Some(index) => self.items[index] = record,
                None => self.items.push(record),
            }
            applied += 1;
        }
        if applied > 0 {
            self.items.sort_by(compare_by_saved_order);
        }
        applied
    }

    fn insert_project<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        if self.project_id.is_none() {
            debug!("project list has no project id; ignoring fetched batch");
            return 0;
        }
        let mut applied = 0;
        for record in records {
            if !is_member_of_project(&record, self.project_id.as_deref()) {
                continue;
            }
            match self.position_of(&record.id) {
                Some(index) => self.items[index] = record,
                None => {
                    let index = self.ordered_position(&record.id);
                    self.items.insert(index, record);
                }
            }
            applied += 1;
        }
        applied
    }

    fn insert_history<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let before = self.items.len();
        self.items
            .extend(records.into_iter().filter(|r| !r.is_design_document()));
        self.items.len() - before
    }

    /// Removes the first record with `id`.
    ///
    /// Returns `true` if a record was removed.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.items.remove(index);
                self.layout.invalidate();
                true
            }
            None => false,
        }
    }

    /// Applies a changed record from the store.
    ///
    /// Saved and history lists replace a listed record in place and put an
    /// unknown record at the head. Project lists additionally follow
    /// membership: a listed record that left the project is removed, an
    /// unlisted record that joined it is inserted by the project order.
    pub fn apply_update(&mut self, record: RequestRecord) -> UpdateOutcome {
        let outcome = match self.mode {
            ListMode::Project => self.update_project(record),
            ListMode::Saved | ListMode::History => match self.position_of(&record.id) {
                Some(index) => {
                    self.items[index] = record;
                    UpdateOutcome::Replaced
                }
                None => {
                    self.items.insert(0, record);
                    UpdateOutcome::Inserted
                }
            },
        };
        if outcome != UpdateOutcome::Ignored {
            self.layout.invalidate();
        }
        outcome
    }

    fn update_project(&mut self, record: RequestRecord) -> UpdateOutcome {
        if self.project_id.is_none() {
            return UpdateOutcome::Ignored;
        }
        let member = is_member_of_project(&record, self.project_id.as_deref());
        match (self.position_of(&record.id), member) {
            (Some(index), true) => {
                self.items[index] = record;
                UpdateOutcome::Replaced
            }
            (Some(index), false) => {
                debug!(id = %record.id, "request left the project");
                self.items.remove(index);
                UpdateOutcome::Removed
            }
            (None, true) => {
                let index = self.ordered_position(&record.id);
                self.items.insert(index, record);
                UpdateOutcome::Inserted
            }
            (None, false) => UpdateOutcome::Ignored,
        }
    }

    /// Reorders the list to match the project's recorded request order.
    ///
    /// Nothing changes unless the order and the list are both non-empty, of
    /// equal length, and every ordered id is listed exactly once. A length
    /// mismatch means an insert or delete is still in flight. Returns `true`
    /// only if the display order actually changed.
    pub fn reorder_to_match(&mut self, project: &Project) -> bool {
        let Some(order) = project.requests.as_deref() else {
            return false;
        };
        if self.items.is_empty() || order.is_empty() || order.len() != self.items.len() {
            return false;
        }

        let mut taken = vec![false; self.items.len()];
        let mut positions = Vec::with_capacity(order.len());
        for id in order {
            let Some(index) = self.position_of(id) else {
                debug!(%id, "project order references an unlisted request");
                return false;
            };
            if std::mem::replace(&mut taken[index], true) {
                return false;
            }
            positions.push(index);
        }

        let changed = positions.iter().enumerate().any(|(i, &index)| i != index);
        if changed {
            let mut slots: Vec<Option<RequestRecord>> =
                std::mem::take(&mut self.items).into_iter().map(Some).collect();
            self.items = positions
                .into_iter()
                .filter_map(|index| slots[index].take())
                .collect();
            self.layout.invalidate();
        }
        changed
    }

    /// Moves the record at `from` to index `to`, as after a drag and drop.
    ///
    /// Returns `false` for out-of-range indices or a move onto itself.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let record = self.items.remove(from);
        self.items.insert(to, record);
        self.layout.invalidate();
        true
    }

    /// Current ids in display order, ready to be persisted as a project
    /// order.
    pub fn compute_order_snapshot(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Whether the display order differs from `persisted`.
    pub fn order_differs_from(&self, persisted: Option<&[String]>) -> bool {
        let current = self.compute_order_snapshot();
        !ids_equal_in_order(Some(&current[..]), persisted)
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Index at which a record with `id` belongs according to the order
    /// snapshot: before the first listed record ranked after it. Records the
    /// snapshot does not know go to the end.
    fn ordered_position(&self, id: &str) -> usize {
        let Some(order) = self.order_snapshot.as_deref() else {
            return self.items.len();
        };
        let ranks: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(rank, id)| (id.as_str(), rank))
            .collect();
        let Some(&rank) = ranks.get(id) else {
            return self.items.len();
        };
        self.items
            .iter()
            .position(|item| ranks.get(item.id.as_str()).map_or(true, |&other| other > rank))
            .unwrap_or(self.items.len())
    }
}
