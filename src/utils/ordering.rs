//! Comparators and membership tests for request lists.

use crate::models::RequestRecord;
use std::cmp::Ordering;

fn present_name(record: &RequestRecord) -> Option<&str> {
    record.name.as_deref().filter(|name| !name.is_empty())
}

/// Orders saved requests by name.
///
/// Records without a name (or with an empty one) sort before named records.
/// Names compare case-insensitively. Names differing only in case put the
/// lower case form first, so `alpha` sorts before `Alpha`.
pub fn compare_by_saved_order(a: &RequestRecord, b: &RequestRecord) -> Ordering {
    match (present_name(a), present_name(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            // Upper case letters have lower code points.
            .then_with(|| right.cmp(left)),
    }
}

/// Orders project requests by `(project_order, name)` ascending.
///
/// Used only for projects that have no recorded request order. A missing
/// `project_order` sorts before any present one, and a missing name before
/// any present one.
pub fn compare_by_legacy_order(a: &RequestRecord, b: &RequestRecord) -> Ordering {
    a.project_order
        .cmp(&b.project_order)
        .then_with(|| a.name.cmp(&b.name))
}

/// Whether two optional id sequences hold the same ids in the same order.
///
/// Two absent sequences are equal; an absent and a present one never are.
pub fn ids_equal_in_order<T: PartialEq>(a: Option<&[T]>, b: Option<&[T]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether `record` belongs to the project `project_id`.
///
/// An absent or empty project id matches nothing.
pub fn is_member_of_project(record: &RequestRecord, project_id: Option<&str>) -> bool {
    let Some(project_id) = project_id.filter(|id| !id.is_empty()) else {
        return false;
    };
    record.projects.iter().any(|id| id == project_id)
        || record.legacy_project.as_deref() == Some(project_id)
}
