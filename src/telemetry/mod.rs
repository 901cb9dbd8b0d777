//! Analytics and error reporting sink.
//!
//! Store failures are reported here before they are returned to the caller,
//! and searches emit a usage event.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Category of search usage events.
pub const SEARCH_CATEGORY: &str = "Content search";

/// An event sent to the analytics sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalyticsEvent {
    /// A usage event.
    Event {
        /// Event category.
        category: String,
        /// Action within the category.
        action: String,
    },
    /// A reported failure.
    Exception {
        /// Human readable description.
        description: String,
        /// Whether the failure ended the session.
        fatal: bool,
    },
}

impl AnalyticsEvent {
    /// A non-fatal exception event describing `error`.
    pub fn exception(error: &dyn std::error::Error) -> Self {
        AnalyticsEvent::Exception {
            description: error.to_string(),
            fatal: false,
        }
    }

    /// The usage event sent after a search in a list of `mode`.
    pub fn search(mode: &str) -> Self {
        AnalyticsEvent::Event {
            category: SEARCH_CATEGORY.to_string(),
            action: format!("{} search", mode),
        }
    }
}

/// Receiver of analytics events.
pub trait ErrorReporter: Send + Sync {
    /// Records one event.
    fn report(&self, event: AnalyticsEvent);
}

/// Reporter that writes events to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, event: AnalyticsEvent) {
        match event {
            AnalyticsEvent::Event { category, action } => {
                info!(%category, %action, "analytics event");
            }
            AnalyticsEvent::Exception { description, fatal } => {
                warn!(%description, fatal, "reported exception");
            }
        }
    }
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingReporter {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
