//! Configuration schema for request lists.
//!
//! This module defines the configuration structure and validation logic for
//! every user-configurable list setting.

use crate::models::ListDensity;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use serde::{Deserialize, Serialize};

/// Settings shared by request lists.
///
/// All settings can be configured under the `"request-lists"` key. Missing
/// settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    /// Number of records requested per page.
    ///
    /// Must be greater than 0. Defaults to 150.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Whether searches also match request payloads.
    ///
    /// Detailed search is slower on large stores. Defaults to false.
    #[serde(default = "default_detailed_search")]
    pub detailed_search: bool,

    /// Whether lists skip loading the first page when attached.
    ///
    /// Defaults to false.
    #[serde(default = "default_no_auto")]
    pub no_auto: bool,

    /// Whether list items can be selected.
    ///
    /// Defaults to false.
    #[serde(default = "default_selectable")]
    pub selectable: bool,

    /// Information density of list items.
    ///
    /// Valid values: "default", "comfortable", "compact".
    #[serde(default = "default_list_density")]
    pub list_density: ListDensity,

    /// How long a delete can be undone, in milliseconds.
    ///
    /// Must be greater than 0. Defaults to 8000.
    #[serde(default = "default_undo_timeout_ms")]
    pub undo_timeout_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            detailed_search: default_detailed_search(),
            no_auto: default_no_auto(),
            selectable: default_selectable(),
            list_density: default_list_density(),
            undo_timeout_ms: default_undo_timeout_ms(),
        }
    }
}

impl ListConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_limit == 0 {
            return Err("pageLimit must be greater than 0".to_string());
        }

        if self.undo_timeout_ms == 0 {
            return Err("undoTimeoutMs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Returns the undo window as a `std::time::Duration`.
    pub fn undo_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.undo_timeout_ms)
    }

    /// Merges this configuration with another, using values from `other`.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    pub fn merge(&self, other: &ListConfig) -> Self {
        Self {
            page_limit: other.page_limit,
            detailed_search: other.detailed_search,
            no_auto: other.no_auto,
            selectable: other.selectable,
            list_density: other.list_density,
            undo_timeout_ms: other.undo_timeout_ms,
        }
    }
}

// Default value functions for serde

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

fn default_detailed_search() -> bool {
    false
}

fn default_no_auto() -> bool {
    false
}

fn default_selectable() -> bool {
    false
}

fn default_list_density() -> ListDensity {
    ListDensity::Default
}

fn default_undo_timeout_ms() -> u64 {
    8000
}
