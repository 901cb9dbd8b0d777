//! List modes, store kinds and display density.

use crate::error::ListError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which reconciliation policy a list instance uses.
///
/// Fixed for the lifetime of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Append-only log of past requests, grouped by day.
    History,
    /// Saved requests sorted by name.
    Saved,
    /// Saved requests belonging to one project, in the project's order.
    Project,
}

impl ListMode {
    /// Returns the mode name used in store scopes and analytics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListMode::History => "history",
            ListMode::Saved => "saved",
            ListMode::Project => "project",
        }
    }

    /// The store that holds this mode's records. Project lists read saved
    /// requests.
    pub fn store_kind(&self) -> StoreKind {
        match self {
            ListMode::History => StoreKind::History,
            ListMode::Saved | ListMode::Project => StoreKind::Saved,
        }
    }
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListMode {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "history" => Ok(ListMode::History),
            "saved" => Ok(ListMode::Saved),
            "project" => Ok(ListMode::Project),
            other => Err(ListError::InvalidMode(other.to_string())),
        }
    }
}

/// Store endpoint a request lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// History store.
    History,
    /// Saved requests store.
    Saved,
}

impl StoreKind {
    /// Returns the store name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::History => "history",
            StoreKind::Saved => "saved",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information density of list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListDensity {
    /// Two-line items, 72px icon column.
    #[default]
    Default,
    /// Single-line items, 48px icon column.
    Comfortable,
    /// Dense single-line items, 36px icon column.
    Compact,
}

impl ListDensity {
    /// Whether items render a secondary line.
    pub fn has_two_lines(&self) -> bool {
        matches!(self, ListDensity::Default)
    }

    /// Width of the item icon column in pixels.
    pub fn icon_width(&self) -> u32 {
        match self {
            ListDensity::Default => 72,
            ListDensity::Comfortable => 48,
            ListDensity::Compact => 36,
        }
    }
}
