//! Incremental day grouping of history records.

use super::group::{compute_day_label, DayGroup, GroupedItem};
use crate::layout::LayoutSignal;
use crate::models::RequestRecord;
use crate::reconciler::UpdateOutcome;
use crate::utils::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// History list organized in day groups, newest day first.
///
/// Groups are keyed by the store-supplied `midnight` of each record. A record
/// without one is bucketed by its own timestamp.
#[derive(Clone)]
pub struct HistoryGrouper {
    groups: Vec<DayGroup>,
    clock: Arc<dyn Clock>,
    layout: LayoutSignal,
}

impl fmt::Debug for HistoryGrouper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryGrouper")
            .field("groups", &self.groups)
            .field("layout", &self.layout)
            .finish()
    }
}

impl Default for HistoryGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryGrouper {
    /// Creates an empty grouper using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty grouper using `clock` for labels and timestamps.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            groups: Vec::new(),
            clock,
            layout: LayoutSignal::default(),
        }
    }

    /// Day groups, newest first.
    pub fn groups(&self) -> &[DayGroup] {
        &self.groups
    }

    /// Number of day groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of records across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Whether no records are listed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether a record with `id` is listed.
    pub fn contains(&self, id: &str) -> bool {
        self.groups.iter().any(|group| group.contains(id))
    }

    /// Record ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter().map(|item| item.record.id.as_str()))
    }

    /// Layout invalidation state.
    pub fn layout(&mut self) -> &mut LayoutSignal {
        &mut self.layout
    }

    /// Removes every group.
    pub fn clear(&mut self) {
        if !self.groups.is_empty() {
            self.groups.clear();
            self.layout.invalidate();
        }
    }

    /// Adds a batch of history records to their day groups.
    ///
    /// Each record goes into the group for its day, before the first strictly
    /// older item. A day without a group gets a new one, placed before the
    /// first older day. The layout is invalidated once per non-empty batch.
    pub fn append_history_items<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = RequestRecord>,
    {
        let mut appended = 0;
        for record in records {
            if record.is_design_document() {
                continue;
            }
            self.insert(record);
            appended += 1;
        }
        if appended > 0 {
            self.layout.invalidate();
        }
        appended
    }

    fn insert(&mut self, record: RequestRecord) {
        let day_key = self.day_key(&record);
        let item = GroupedItem::new(record, self.clock.as_ref());
        match self.groups.iter_mut().find(|group| group.day_key == day_key) {
            Some(group) => {
                let index = group.insert_position(&item.record);
                group.items.insert(index, item);
            }
            None => {
                let group = DayGroup::new(day_key, item, self.clock.as_ref());
                let index = self.find_group_insert_position(day_key);
                self.groups.insert(index, group);
            }
        }
    }

    fn day_key(&self, record: &RequestRecord) -> i64 {
        match record.midnight {
            Some(midnight) => midnight,
            None => {
                let time = record
                    .effective_timestamp()
                    .unwrap_or_else(|| self.clock.now_millis());
                self.clock.midnight_of(time)
            }
        }
    }

    /// Index of the first group older than `day_key`.
    pub fn find_group_insert_position(&self, day_key: i64) -> usize {
        self.groups
            .iter()
            .position(|group| group.day_key < day_key)
            .unwrap_or(self.groups.len())
    }

    /// Removes the first item with `id`, dropping its group if it becomes
    /// empty. Other groups are untouched.
    ///
    /// Returns `true` if an item was removed.
    pub fn remove_by_record_id(&mut self, id: &str) -> bool {
        for index in 0..self.groups.len() {
            let group = &mut self.groups[index];
            let Some(position) = group.items.iter().position(|item| item.record.id == id) else {
                continue;
            };
            group.items.remove(position);
            if group.items.is_empty() {
                debug!(day_key = group.day_key, "removing emptied history group");
                self.groups.remove(index);
            }
            self.layout.invalidate();
            return true;
        }
        false
    }

    /// Applies a changed history record.
    ///
    /// History is append-only: an empty list is seeded with the record, a
    /// listed copy is dropped as stale, anything else is ignored.
    pub fn apply_update(&mut self, record: RequestRecord) -> UpdateOutcome {
        if self.groups.is_empty() {
            self.append_history_items([record]);
            return UpdateOutcome::Inserted;
        }
        if self.remove_by_record_id(&record.id) {
            UpdateOutcome::Removed
        } else {
            UpdateOutcome::Ignored
        }
    }

    /// Flips the expansion of the group at `index`.
    ///
    /// Returns the new state, or `None` when the index is out of range.
    pub fn toggle_group_expansion(&mut self, index: usize) -> Option<bool> {
        let group = self.groups.get_mut(index)?;
        group.expanded = !group.expanded;
        self.layout.invalidate();
        Some(group.expanded)
    }

    /// Recomputes every group label against the current day.
    ///
    /// Labels are otherwise fixed when a group is created, so a "Today"
    /// group stays "Today" after midnight until this is called.
    pub fn refresh_labels(&mut self) -> usize {
        let mut changed = 0;
        for group in &mut self.groups {
            let Some(first) = group.items.first() else {
                continue;
            };
            let label = compute_day_label(group.day_key, &first.record, self.clock.as_ref());
            if label != group.label {
                group.label = label;
                changed += 1;
            }
        }
        if changed > 0 {
            self.layout.invalidate();
        }
        changed
    }
}
