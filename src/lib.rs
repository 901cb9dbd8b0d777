//! Request list maintenance for a REST client.
//!
//! This crate keeps the in-memory lists a REST client renders in sync with
//! its document store: request history grouped by day, saved requests sorted
//! by name, and project lists in the project's persisted order.
//!
//! # Architecture
//!
//! - **models**: request records, projects, list modes and densities
//! - **utils**: pure ordering helpers, the clock and query normalization
//! - **reconciler**: flat saved and project lists
//! - **history**: day-grouped history lists
//! - **pagination**: cursor tracking and fetch coalescing
//! - **store**: the async store client contract
//! - **events**: store change notifications and subscriptions
//! - **telemetry**: analytics and error reporting sink
//! - **selection**: multi-select state
//! - **list**: the [`RequestList`] coordinator wiring everything together
//! - **config**: user settings
//!
//! # Usage
//!
//! ```no_run
//! use request_lists::{ListMode, NotificationBus, RequestList, StoreClient};
//! use std::sync::Arc;
//!
//! async fn show_history<S: StoreClient>(store: Arc<S>, bus: &NotificationBus) {
//!     let mut list = RequestList::new(ListMode::History, store);
//!     // Subscribes and loads the first page.
//!     list.attach(bus).await.ok();
//!
//!     // Later, after the store published changes:
//!     list.drain_notifications().await.ok();
//!     for group in list.history().into_iter().flat_map(|h| h.groups()) {
//!         println!("{} ({} requests)", group.label, group.items.len());
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod layout;
pub mod list;
pub mod models;
pub mod pagination;
pub mod reconciler;
pub mod selection;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use error::{ListError, Result, StoreError};
pub use events::{ChangeNotification, DestroyScope, NotificationBus, Subscription};
pub use history::{DayGroup, GroupedItem, HistoryGrouper};
pub use list::{ListContent, NavigationTarget, RequestList};
pub use models::{ListDensity, ListMode, Project, RequestRecord, StoreKind};
pub use reconciler::{RequestListReconciler, UpdateOutcome};
pub use store::{ChangeRecord, DeletedRecord, ListResponse, PageRequest, StoreClient};
