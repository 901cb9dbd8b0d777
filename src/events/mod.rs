//! Store change notifications.
//!
//! The store publishes changes on a [`NotificationBus`]. Each list holds a
//! [`Subscription`]; dropping it unsubscribes, so a torn-down list never
//! receives another notification.

use crate::models::{ListMode, Project, RequestRecord, StoreKind};
use crate::store::ChangeRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use uuid::Uuid;

/// Scope of a store wipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyScope {
    /// One request store was emptied.
    Store(StoreKind),
    /// The project store was emptied.
    Projects,
    /// Every store was emptied.
    All,
}

impl DestroyScope {
    /// Whether a list in `mode` shows data from the wiped scope.
    pub fn affects(&self, mode: ListMode) -> bool {
        match self {
            DestroyScope::All => true,
            DestroyScope::Store(kind) => *kind == mode.store_kind(),
            DestroyScope::Projects => mode == ListMode::Project,
        }
    }
}

/// A change published by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeNotification {
    /// A request was deleted.
    RequestDeleted {
        /// Store the request lived in.
        kind: StoreKind,
        /// Id of the deleted request.
        id: String,
    },
    /// A request was created or changed.
    RequestUpdated {
        /// Store the request lives in.
        kind: StoreKind,
        /// The change, with or without the record.
        change: ChangeRecord<RequestRecord>,
    },
    /// A project was changed.
    ProjectUpdated(ChangeRecord<Project>),
    /// A store was wiped.
    StoreDestroyed(DestroyScope),
    /// Data was imported in bulk.
    DataImported,
}

type SenderMap = HashMap<Uuid, UnboundedSender<ChangeNotification>>;
type Subscribers = Mutex<SenderMap>;

fn lock(subscribers: &Subscribers) -> MutexGuard<'_, SenderMap> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out channel for store change notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationBus {
    subscribers: Arc<Subscribers>,
}

impl NotificationBus {
    /// Creates a bus without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        lock(&self.subscribers).insert(id, sender);
        Subscription {
            id,
            receiver,
            bus: Arc::downgrade(&self.subscribers),
        }
    }

    /// Delivers `notification` to every subscriber, in publish order.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, notification: ChangeNotification) -> usize {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|_, sender| sender.send(notification.clone()).is_ok());
        subscribers.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

/// A registration on a [`NotificationBus`], released on drop.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: UnboundedReceiver<ChangeNotification>,
    bus: Weak<Subscribers>,
}

impl Subscription {
    /// Unique id of this subscription.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the next queued notification without waiting.
    pub fn try_next(&mut self) -> Option<ChangeNotification> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next notification. Returns `None` once the bus is gone
    /// and the queue is drained.
    pub async fn next(&mut self) -> Option<ChangeNotification> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.bus.upgrade() {
            lock(&subscribers).remove(&self.id);
            debug!(subscription = %self.id, "notification subscription released");
        }
    }
}
