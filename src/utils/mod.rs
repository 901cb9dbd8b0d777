//! Pure helpers shared by the list components.

pub mod clock;
pub mod ordering;

pub use clock::{to_iso_string, today_midnight, Clock, FixedClock, SystemClock, DAY_MILLIS};
pub use ordering::{
    compare_by_legacy_order, compare_by_saved_order, ids_equal_in_order, is_member_of_project,
};

use crate::error::{ListError, Result};
use crate::models::{ListDensity, ListMode};

/// Whether a list with the given density name renders two-line items.
///
/// Only an unset density or `"default"` does.
pub fn density_has_two_lines(density: Option<&str>) -> bool {
    matches!(density, None | Some("default"))
}

/// Parses a density name, falling back to [`ListDensity::Default`] for
/// unknown names.
pub fn parse_density(density: Option<&str>) -> ListDensity {
    match density {
        Some("comfortable") => ListDensity::Comfortable,
        Some("compact") => ListDensity::Compact,
        _ => ListDensity::Default,
    }
}

/// Validates a list mode name. An unset mode is an error.
pub fn validate_mode(mode: Option<&str>) -> Result<ListMode> {
    match mode {
        Some(mode) => mode.parse(),
        None => Err(ListError::InvalidMode(String::new())),
    }
}

/// Normalizes a search term: lower case, with one leading `_` removed.
///
/// The store reserves `_`-prefixed keys, so a leading underscore would never
/// match anything.
pub fn prepare_query(term: &str) -> String {
    let lower = term.to_lowercase();
    match lower.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}
