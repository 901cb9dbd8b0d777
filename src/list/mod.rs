//! The list coordinator.
//!
//! [`RequestList`] owns the in-memory state of one rendered list and wires
//! together the components that maintain it: a [`HistoryGrouper`] or a
//! [`RequestListReconciler`] depending on the mode, a [`PaginationDriver`],
//! a [`SelectionSet`], the store client and an optional notification
//! subscription.
//!
//! Store failures are reported to the configured [`ErrorReporter`] and then
//! returned as [`ListError::Store`].

use crate::config::{get_config, ListConfig};
use crate::error::{ListError, Result, StoreError};
use crate::events::{ChangeNotification, NotificationBus, Subscription};
use crate::history::HistoryGrouper;
use crate::layout::LayoutSignal;
use crate::models::{ListDensity, ListMode, Project, RequestRecord, StoreKind};
use crate::pagination::PaginationDriver;
use crate::reconciler::{RequestListReconciler, UpdateOutcome};
use crate::selection::SelectionSet;
use crate::store::{ChangeRecord, DeletedRecord, StoreClient};
use crate::telemetry::{AnalyticsEvent, ErrorReporter, TracingReporter};
use crate::utils::{
    compare_by_legacy_order, ids_equal_in_order, prepare_query, validate_mode, Clock, SystemClock,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the consumer should navigate when a list item is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    /// Store the request is read from.
    pub kind: StoreKind,
    /// Request id.
    pub id: String,
}

/// Records removed by the last delete, restorable until the undo window
/// closes.
#[derive(Debug, Clone)]
struct PendingUndo {
    records: Vec<DeletedRecord>,
    deleted_at: i64,
}

/// Mode-specific list state.
#[derive(Debug)]
pub enum ListContent {
    /// Day-grouped history.
    History(HistoryGrouper),
    /// Flat saved or project list.
    Flat(RequestListReconciler),
}

impl ListContent {
    fn for_mode(mode: ListMode) -> Self {
        match mode {
            ListMode::History => ListContent::History(HistoryGrouper::new()),
            other => ListContent::Flat(RequestListReconciler::new(other)),
        }
    }

    fn len(&self) -> usize {
        match self {
            ListContent::History(grouper) => grouper.len(),
            ListContent::Flat(list) => list.len(),
        }
    }

    fn contains(&self, id: &str) -> bool {
        match self {
            ListContent::History(grouper) => grouper.contains(id),
            ListContent::Flat(list) => list.contains(id),
        }
    }

    fn ids(&self) -> Vec<String> {
        match self {
            ListContent::History(grouper) => grouper.ids().map(str::to_string).collect(),
            ListContent::Flat(list) => list.ids().map(str::to_string).collect(),
        }
    }

    fn clear(&mut self) {
        match self {
            ListContent::History(grouper) => grouper.clear(),
            ListContent::Flat(list) => list.clear(),
        }
    }

    fn append(&mut self, records: Vec<RequestRecord>) -> usize {
        match self {
            ListContent::History(grouper) => grouper.append_history_items(records),
            ListContent::Flat(list) => list.apply_insert_batch(records),
        }
    }

    fn apply_delete(&mut self, id: &str) -> bool {
        match self {
            ListContent::History(grouper) => grouper.remove_by_record_id(id),
            ListContent::Flat(list) => list.apply_delete(id),
        }
    }

    fn apply_update(&mut self, record: RequestRecord) -> UpdateOutcome {
        match self {
            ListContent::History(grouper) => grouper.apply_update(record),
            ListContent::Flat(list) => list.apply_update(record),
        }
    }

    fn take_layout(&mut self) -> bool {
        match self {
            ListContent::History(grouper) => grouper.layout().take(),
            ListContent::Flat(list) => list.layout().take(),
        }
    }
}

/// A request list bound to a store.
pub struct RequestList<S: StoreClient + ?Sized> {
    mode: ListMode,
    store: Arc<S>,
    reporter: Arc<dyn ErrorReporter>,
    content: ListContent,
    driver: PaginationDriver,
    selection: SelectionSet,
    project: Option<Project>,
    density: ListDensity,
    detailed_search: bool,
    no_auto: bool,
    subscription: Option<Subscription>,
    last_deleted: Option<PendingUndo>,
    undo_window_ms: i64,
    clock: Arc<dyn Clock>,
    layout: LayoutSignal,
}

impl<S: StoreClient + ?Sized> std::fmt::Debug for RequestList<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestList")
            .field("mode", &self.mode)
            .field("content", &self.content)
            .field("driver", &self.driver)
            .field("selection", &self.selection)
            .field("project", &self.project)
            .field("density", &self.density)
            .field("attached", &self.subscription.is_some())
            .finish()
    }
}

impl<S: StoreClient + ?Sized> RequestList<S> {
    /// Creates a list using the global configuration.
    pub fn new(mode: ListMode, store: Arc<S>) -> Self {
        Self::with_config(mode, store, &get_config())
    }

    /// Creates a list from a mode name, as read from a settings attribute.
    pub fn from_mode_name(mode: Option<&str>, store: Arc<S>) -> Result<Self> {
        Ok(Self::new(validate_mode(mode)?, store))
    }

    /// Creates a project list for `project_id` using the global configuration.
    pub fn for_project(project_id: impl Into<String>, store: Arc<S>) -> Self {
        let mut list = Self::new(ListMode::Project, store);
        list.content = ListContent::Flat(RequestListReconciler::for_project(project_id));
        list
    }

    /// Creates a list with explicit settings.
    pub fn with_config(mode: ListMode, store: Arc<S>, config: &ListConfig) -> Self {
        Self {
            mode,
            store,
            reporter: Arc::new(TracingReporter),
            content: ListContent::for_mode(mode),
            driver: PaginationDriver::new(config.page_limit),
            selection: SelectionSet::new(config.selectable),
            project: None,
            density: config.list_density,
            detailed_search: config.detailed_search,
            no_auto: config.no_auto,
            subscription: None,
            last_deleted: None,
            undo_window_ms: i64::try_from(config.undo_timeout().as_millis()).unwrap_or(i64::MAX),
            clock: Arc::new(SystemClock),
            layout: LayoutSignal::default(),
        }
    }

    /// Replaces the analytics sink.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the time source used for day groups and the undo window.
    /// Existing history groups are discarded.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        if let ListContent::History(_) = self.content {
            self.content = ListContent::History(HistoryGrouper::with_clock(clock.clone()));
        }
        self.clock = clock;
        self
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The store kind records of this list are read from and written to.
    pub fn read_type(&self) -> StoreKind {
        self.mode.store_kind()
    }

    pub fn content(&self) -> &ListContent {
        &self.content
    }

    /// Day groups of a history list.
    pub fn history(&self) -> Option<&HistoryGrouper> {
        match &self.content {
            ListContent::History(grouper) => Some(grouper),
            ListContent::Flat(_) => None,
        }
    }

    /// Records of a saved or project list in display order.
    pub fn requests(&self) -> Option<&[RequestRecord]> {
        match &self.content {
            ListContent::History(_) => None,
            ListContent::Flat(list) => Some(list.items()),
        }
    }

    /// Cached project of a project list.
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Ids of every listed record in display order.
    pub fn ids(&self) -> Vec<String> {
        self.content.ids()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.content.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.content.len() == 0
    }

    pub fn has_requests(&self) -> bool {
        !self.is_empty()
    }

    /// Whether a page fetch or search is outstanding.
    pub fn querying(&self) -> bool {
        self.driver.is_in_flight()
    }

    /// Whether the list shows search results.
    pub fn is_search(&self) -> bool {
        self.driver.is_search()
    }

    /// Nothing to show outside of a search once loading finished.
    pub fn data_unavailable(&self) -> bool {
        !self.querying() && !self.is_search() && !self.has_requests()
    }

    /// A finished search that matched nothing.
    pub fn search_list_empty(&self) -> bool {
        !self.querying() && self.is_search() && !self.has_requests()
    }

    pub fn pagination(&self) -> &PaginationDriver {
        &self.driver
    }

    /// Subscribes to `bus` and loads the first page unless auto loading is
    /// disabled. A previous subscription is released.
    pub async fn attach(&mut self, bus: &NotificationBus) -> Result<usize> {
        self.subscription = Some(bus.subscribe());
        if self.no_auto || self.querying() || self.has_requests() {
            return Ok(0);
        }
        self.load_next().await
    }

    /// Releases the notification subscription.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Loads the next page and appends it.
    ///
    /// Project lists are not paginated: the first call loads every request of
    /// the project and later calls do nothing. Returns the number of records
    /// added.
    pub async fn load_next(&mut self) -> Result<usize> {
        if self.mode == ListMode::Project {
            if self.project.is_some() {
                return Ok(0);
            }
            let project_id = match self.project_id() {
                Some(id) => id.to_string(),
                None => return Ok(0),
            };
            return self.read_project_requests(&project_id).await;
        }

        let Some(ticket) = self.driver.begin_page() else {
            debug!(mode = %self.mode, "page request coalesced");
            return Ok(0);
        };
        let result = {
            let guard = self.driver.guard(ticket.generation());
            let result = self.store.list(self.mode, ticket.page.clone()).await;
            guard.settle();
            result
        };
        match result {
            Ok(response) => {
                if !self.driver.finish_page(&ticket, response.next_page_token) {
                    warn!(mode = %self.mode, "discarding stale page");
                    return Ok(0);
                }
                let added = self.content.append(response.items);
                debug!(mode = %self.mode, added, "page loaded");
                Ok(added)
            }
            Err(e) => {
                self.driver.fail_page(&ticket);
                Err(self.report(e))
            }
        }
    }

    /// Clears the list and the cursor, then loads the first page again.
    pub async fn refresh(&mut self) -> Result<usize> {
        self.reset();
        self.load_next().await
    }

    /// Clears the list, the cursor and the search state.
    pub fn reset(&mut self) {
        self.driver.reset();
        self.content.clear();
        self.project = None;
        self.prune_selection();
    }

    /// Replaces the list with search results for `term`.
    ///
    /// An empty term ends an active search by refreshing and is otherwise
    /// ignored.
    pub async fn search(&mut self, term: &str) -> Result<usize> {
        if term.is_empty() {
            if self.driver.is_search() {
                return self.refresh().await;
            }
            return Ok(0);
        }

        let ticket = self.driver.begin_search(prepare_query(term));
        self.content.clear();
        self.prune_selection();

        let result = {
            let guard = self.driver.guard(ticket.generation());
            let result = self
                .store
                .query(&ticket.term, self.mode, self.detailed_search)
                .await;
            guard.settle();
            result
        };
        let current = self.driver.finish_search(&ticket);
        let items = result.map_err(|e| self.report(e))?;

        self.reporter.report(AnalyticsEvent::search(self.mode.as_str()));
        if !current {
            warn!(mode = %self.mode, "discarding stale search results");
            return Ok(0);
        }
        Ok(self.content.append(items))
    }

    /// Applies one store notification.
    pub async fn handle_notification(&mut self, notification: ChangeNotification) -> Result<()> {
        match notification {
            ChangeNotification::RequestDeleted { kind, id } => {
                if kind == self.read_type() {
                    self.apply_delete(&id);
                }
            }
            ChangeNotification::RequestUpdated { kind, change } => {
                if kind != self.read_type() {
                    return Ok(());
                }
                let record = match change.item {
                    Some(record) => record,
                    None => self
                        .store
                        .read(kind, &change.id)
                        .await
                        .map_err(|e| self.report(e))?,
                };
                self.apply_update(record);
            }
            ChangeNotification::ProjectUpdated(change) => {
                self.apply_project_change(change).await?;
            }
            ChangeNotification::StoreDestroyed(scope) => {
                if scope.affects(self.mode) {
                    self.refresh().await?;
                }
            }
            ChangeNotification::DataImported => {
                self.refresh().await?;
            }
        }
        Ok(())
    }

    /// Applies every queued notification in delivery order.
    ///
    /// A failing notification does not stop the rest; the first error is
    /// returned after the queue is drained.
    pub async fn drain_notifications(&mut self) -> Result<usize> {
        let pending: Vec<ChangeNotification> = match self.subscription.as_mut() {
            Some(subscription) => std::iter::from_fn(|| subscription.try_next()).collect(),
            None => return Ok(0),
        };

        let count = pending.len();
        let mut first_error = None;
        for notification in pending {
            if let Err(e) = self.handle_notification(notification).await {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(count),
        }
    }

    /// Removes a record. Unknown ids are ignored.
    pub fn apply_delete(&mut self, id: &str) -> bool {
        let removed = self.content.apply_delete(id);
        if removed {
            self.selection.deselect(id);
        }
        removed
    }

    /// Reconciles a changed record with the list.
    pub fn apply_update(&mut self, record: RequestRecord) -> UpdateOutcome {
        let id = record.id.clone();
        let outcome = self.content.apply_update(record);
        if outcome == UpdateOutcome::Removed {
            self.selection.deselect(&id);
        }
        outcome
    }

    async fn apply_project_change(&mut self, change: ChangeRecord<Project>) -> Result<()> {
        if self.mode != ListMode::Project {
            return Ok(());
        }
        match &self.project {
            Some(current) if current.id == change.id => {}
            _ => return Ok(()),
        }

        let project = match change.item {
            Some(project) => project,
            None => self
                .store
                .read_project(&change.id)
                .await
                .map_err(|e| self.report(e))?,
        };
        if let ListContent::Flat(list) = &mut self.content {
            list.reorder_to_match(&project);
            list.set_order_snapshot(project.requests.clone());
        }
        self.project = Some(project);
        Ok(())
    }

    fn project_id(&self) -> Option<&str> {
        match &self.content {
            ListContent::Flat(list) => list.project_id(),
            ListContent::History(_) => None,
        }
    }

    /// Loads every request of a project into a project list, replacing its
    /// content.
    pub async fn read_project_requests(&mut self, project_id: &str) -> Result<usize> {
        if self.mode != ListMode::Project {
            return Err(ListError::PreconditionViolation(format!(
                "project requests can only be read into a project list, not a {} list",
                self.mode
            )));
        }

        let project = match &self.project {
            Some(project) if project.id == project_id => project.clone(),
            _ => self
                .store
                .read_project(project_id)
                .await
                .map_err(|e| self.report(e))?,
        };
        let mut requests = self
            .store
            .project_requests(project_id)
            .await
            .map_err(|e| self.report(e))?;
        if project.requests.is_none() {
            requests.sort_by(compare_by_legacy_order);
        }

        let added = match &mut self.content {
            ListContent::Flat(list) => {
                list.clear();
                list.set_project(&project);
                list.apply_insert_batch(requests)
            }
            ListContent::History(_) => 0,
        };
        self.project = Some(project);
        self.prune_selection();
        debug!(project = project_id, added, "project requests loaded");
        Ok(added)
    }

    /// Moves a record of a flat list, as after a drag and drop.
    pub fn move_request(&mut self, from: usize, to: usize) -> bool {
        match &mut self.content {
            ListContent::Flat(list) => list.move_item(from, to),
            ListContent::History(_) => false,
        }
    }

    /// Writes the current display order to the cached project.
    ///
    /// Returns `Ok(None)` when the order did not change.
    pub async fn persist_order(&mut self) -> Result<Option<ChangeRecord<Project>>> {
        let Some(project) = self.project.as_ref() else {
            return Err(ListError::PreconditionViolation(
                "no project to persist the order to".to_string(),
            ));
        };
        let ListContent::Flat(list) = &self.content else {
            return Err(ListError::PreconditionViolation(
                "history lists have no order".to_string(),
            ));
        };

        let order = list.compute_order_snapshot();
        if ids_equal_in_order(project.requests.as_deref(), Some(order.as_slice())) {
            return Ok(None);
        }

        let mut updated = project.clone();
        updated.requests = Some(order.clone());
        let change = self
            .store
            .update_project(updated.clone())
            .await
            .map_err(|e| self.report(e))?;

        if let ListContent::Flat(list) = &mut self.content {
            list.set_order_snapshot(Some(order));
        }
        self.project = Some(updated);
        Ok(Some(change))
    }

    /// Writes a record to the list's store.
    pub async fn update_request(
        &self,
        record: RequestRecord,
    ) -> Result<ChangeRecord<RequestRecord>> {
        self.store
            .update(self.read_type(), record)
            .await
            .map_err(|e| self.report(e))
    }

    /// Writes several records to the list's store.
    pub async fn update_bulk(
        &self,
        records: Vec<RequestRecord>,
    ) -> Result<Vec<ChangeRecord<RequestRecord>>> {
        self.store
            .update_bulk(self.read_type(), records)
            .await
            .map_err(|e| self.report(e))
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selects a listed record. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        self.content.contains(id) && self.selection.select(id)
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selection.deselect(id)
    }

    /// Flips the selection of a listed record.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.content.contains(id) {
            return false;
        }
        self.selection.toggle(id)
    }

    /// Selects every listed record, or clears the selection when all were
    /// selected.
    pub fn toggle_select_all(&mut self) -> bool {
        let ids = self.content.ids();
        self.selection.toggle_all(ids.iter().map(String::as_str))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn prune_selection(&mut self) {
        let content = &self.content;
        self.selection.retain_present(|id| content.contains(id));
    }

    /// Deletes the selected records from the store and removes them from the
    /// list. The deletion can be reverted with [`RequestList::undo_delete`].
    pub async fn delete_selected(&mut self) -> Result<usize> {
        let ids = self.selection.take();
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .store
            .delete_bulk(self.read_type(), ids)
            .await
            .map_err(|e| self.report(e))?;
        for record in &deleted {
            self.content.apply_delete(&record.id);
        }
        let count = deleted.len();
        self.last_deleted = Some(PendingUndo {
            records: deleted,
            deleted_at: self.clock.now_millis(),
        });
        Ok(count)
    }

    fn undo_open(&self, pending: &PendingUndo) -> bool {
        !pending.records.is_empty()
            && self.clock.now_millis().saturating_sub(pending.deleted_at) < self.undo_window_ms
    }

    /// Whether a deletion can still be undone.
    pub fn can_undo(&self) -> bool {
        self.last_deleted
            .as_ref()
            .is_some_and(|pending| self.undo_open(pending))
    }

    /// Restores the records removed by the last [`RequestList::delete_selected`].
    ///
    /// Does nothing once the undo window configured by `undoTimeoutMs` has
    /// passed.
    pub async fn undo_delete(&mut self) -> Result<usize> {
        let Some(pending) = self.last_deleted.take() else {
            return Ok(0);
        };
        if !self.undo_open(&pending) {
            debug!(deleted = pending.records.len(), "undo window closed");
            return Ok(0);
        }

        let result = self
            .store
            .undelete_bulk(self.read_type(), pending.records.clone())
            .await;
        match result {
            Ok(restored) => {
                let records: Vec<RequestRecord> =
                    restored.into_iter().filter_map(|change| change.item).collect();
                Ok(self.content.append(records))
            }
            Err(e) => {
                self.last_deleted = Some(pending);
                Err(self.report(e))
            }
        }
    }

    /// Navigation target for a listed record.
    pub fn open_request(&self, id: &str) -> NavigationTarget {
        NavigationTarget {
            kind: self.read_type(),
            id: id.to_string(),
        }
    }

    /// Flips a history group between expanded and collapsed.
    pub fn toggle_group_expansion(&mut self, index: usize) -> Option<bool> {
        match &mut self.content {
            ListContent::History(grouper) => grouper.toggle_group_expansion(index),
            ListContent::Flat(_) => None,
        }
    }

    /// Recomputes history day labels against the current day.
    pub fn refresh_labels(&mut self) -> usize {
        match &mut self.content {
            ListContent::History(grouper) => grouper.refresh_labels(),
            ListContent::Flat(_) => 0,
        }
    }

    pub fn density(&self) -> ListDensity {
        self.density
    }

    pub fn set_density(&mut self, density: ListDensity) {
        if self.density != density {
            self.density = density;
            self.layout.invalidate();
        }
    }

    /// Whether items render a second line with the URL.
    pub fn has_two_lines(&self) -> bool {
        self.density.has_two_lines()
    }

    /// Width of the method label column in pixels.
    pub fn icon_width(&self) -> u32 {
        self.density.icon_width()
    }

    /// Consumes a pending layout invalidation of the list or its content.
    pub fn take_layout_invalidated(&mut self) -> bool {
        let own = self.layout.take();
        let content = self.content.take_layout();
        own || content
    }

    fn report(&self, error: StoreError) -> ListError {
        warn!(mode = %self.mode, error = %error, "store operation failed");
        self.reporter.report(AnalyticsEvent::exception(&error));
        ListError::Store(error)
    }
}
