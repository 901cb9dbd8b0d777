//! Day groups of history records.

use crate::models::RequestRecord;
use crate::utils::{to_iso_string, Clock, DAY_MILLIS};
use serde::{Deserialize, Serialize};

/// Label of the group holding today's requests.
pub const TODAY_LABEL: &str = "Today";

/// Label of the group holding yesterday's requests.
pub const YESTERDAY_LABEL: &str = "Yesterday";

/// A history record placed in a day group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedItem {
    /// The history record.
    pub record: RequestRecord,

    /// ISO-8601 time of the request, computed once on insertion.
    pub render_timestamp: String,
}

impl GroupedItem {
    /// Wraps a record, rendering its `updated`, `created` or the current time.
    pub fn new(record: RequestRecord, clock: &dyn Clock) -> Self {
        let time = record
            .effective_timestamp()
            .unwrap_or_else(|| clock.now_millis());
        Self {
            render_timestamp: to_iso_string(time),
            record,
        }
    }
}

/// History records sharing one local calendar day.
///
/// Items are ordered newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    /// Midnight of the group's day, epoch milliseconds.
    pub day_key: i64,

    /// Header label, computed when the group is created.
    pub label: String,

    /// Whether the group's items are shown.
    pub expanded: bool,

    /// Records of the day, newest first.
    pub items: Vec<GroupedItem>,
}

impl DayGroup {
    /// Creates an expanded group holding `item`.
    pub fn new(day_key: i64, item: GroupedItem, clock: &dyn Clock) -> Self {
        let label = compute_day_label(day_key, &item.record, clock);
        Self {
            day_key,
            label,
            expanded: true,
            items: vec![item],
        }
    }

    /// Index at which `record` belongs: before the first item strictly older
    /// than it, so records with equal times keep arrival order.
    pub fn insert_position(&self, record: &RequestRecord) -> usize {
        let Some(time) = record.effective_timestamp() else {
            return self.items.len();
        };
        self.items
            .iter()
            .position(|item| {
                item.record
                    .effective_timestamp()
                    .is_some_and(|existing| existing < time)
            })
            .unwrap_or(self.items.len())
    }

    /// Whether the group holds a record with `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.record.id == id)
    }
}

/// Computes a day group header.
///
/// `Today` and `Yesterday` relative to the clock's current day, otherwise the
/// record's long date such as `Tuesday, November 14, 2023`.
pub fn compute_day_label(day_key: i64, record: &RequestRecord, clock: &dyn Clock) -> String {
    let today = clock.today_midnight();
    if day_key == today {
        return TODAY_LABEL.to_string();
    }
    if day_key == today - DAY_MILLIS {
        return YESTERDAY_LABEL.to_string();
    }
    let time = record
        .effective_timestamp()
        .unwrap_or_else(|| clock.now_millis());
    clock.format_long_date(time)
}
