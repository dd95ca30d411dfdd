use std::collections::HashMap;

/// Per-parent expand/collapse state for nested replies. Hidden by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    shown: HashMap<String, bool>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `parent_id` only and returns its new state.
    pub fn toggle(&mut self, parent_id: &str) -> bool {
        let entry = self.shown.entry(parent_id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_shown(&self, parent_id: &str) -> bool {
        self.shown.get(parent_id).copied().unwrap_or(false)
    }

    pub fn show_all<'a>(&mut self, parent_ids: impl IntoIterator<Item = &'a str>) {
        for id in parent_ids {
            self.shown.insert(id.to_string(), true);
        }
    }

    pub fn reset(&mut self) {
        self.shown.clear();
    }
}
