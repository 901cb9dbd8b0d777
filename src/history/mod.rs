//! Request history lists.
//!
//! History is an append-only log of past requests, shown in day groups with
//! the newest day first and the newest request first within a day.
//!
//! # Example
//!
//! ```
//! use request_lists::history::HistoryGrouper;
//! use request_lists::models::RequestRecord;
//!
//! let mut grouper = HistoryGrouper::new();
//! let record = RequestRecord::new("r1", "GET", "https://api.example.com/users")
//!     .with_times(1_700_000_000_000, 1_699_920_000_000);
//! grouper.append_history_items([record]);
//! assert_eq!(grouper.group_count(), 1);
//! ```

pub mod group;
pub mod grouper;

pub use group::{compute_day_label, DayGroup, GroupedItem, TODAY_LABEL, YESTERDAY_LABEL};
pub use grouper::HistoryGrouper;
