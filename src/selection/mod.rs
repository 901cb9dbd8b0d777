//! Multi-select state for request lists.

/// Ids of selected records, in selection order.
///
/// A disabled selection ignores every change and reports nothing selected.
/// Owners prune it after removals so it never names a record that is not
/// listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    enabled: bool,
    ids: Vec<String>,
    all_selected: bool,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ids: Vec::new(),
            all_selected: false,
        }
    }

    /// Whether selection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables selection. Disabling clears it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Selected ids, or `None` when selection is disabled.
    pub fn selected(&self) -> Option<&[String]> {
        self.enabled.then_some(self.ids.as_slice())
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selects `id`. Returns `true` if the selection changed.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.enabled || self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Deselects `id`. Returns `true` if the selection changed.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        let changed = self.ids.len() != before;
        if changed {
            self.all_selected = false;
        }
        changed
    }

    /// Flips the selection of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.deselect(id);
            false
        } else {
            self.select(id)
        }
    }

    /// Selects every id in `ids`, or clears the selection if the previous
    /// call selected everything. Returns whether everything is now selected.
    pub fn toggle_all<'a, I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.enabled {
            return false;
        }
        self.all_selected = !self.all_selected;
        self.ids.clear();
        if self.all_selected {
            self.ids.extend(ids.into_iter().map(str::to_string));
        }
        self.all_selected
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.all_selected = false;
    }

    /// Drops selected ids rejected by `is_present`. Returns how many were
    /// dropped.
    pub fn retain_present<F>(&mut self, mut is_present: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.ids.len();
        self.ids.retain(|id| is_present(id));
        before - self.ids.len()
    }

    /// Takes the selected ids, leaving the selection empty.
    pub fn take(&mut self) -> Vec<String> {
        self.all_selected = false;
        std::mem::take(&mut self.ids)
    }
}
