//! Hidden-list manager
//!
//! Keeps the persisted hidden set and the list view filter mode. The two
//! modes are mutually exclusive: the list shows either visible tracks or
//! hidden tracks, never both and never neither.

use reprise_core::HiddenSet;
use reprise_storage::ProgressStore;
use serde::{Deserialize, Serialize};

/// Which side of the hidden set the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Tracks not in the hidden set
    #[default]
    Visible,
    /// Tracks in the hidden set
    Hidden,
}

impl ViewMode {
    /// The other mode
    pub fn flipped(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Hidden set plus view mode
#[derive(Debug, Clone)]
pub struct HiddenList {
    store: ProgressStore,
    hidden: HiddenSet,
    mode: ViewMode,
}

impl HiddenList {
    /// Load the persisted hidden set; the view starts on visible tracks
    pub fn load(store: ProgressStore) -> Self {
        let hidden = store.hidden_tracks();
        Self {
            store,
            hidden,
            mode: ViewMode::Visible,
        }
    }

    /// Hide `name`; hiding twice changes nothing
    pub fn hide(&mut self, name: &str) {
        if self.hidden.insert(name) {
            tracing::debug!("Hid '{}'", name);
            self.store.set_hidden_tracks(&self.hidden);
        }
    }

    /// Unhide `name`; unhiding a visible track changes nothing
    pub fn unhide(&mut self, name: &str) {
        if self.hidden.remove(name) {
            tracing::debug!("Unhid '{}'", name);
            self.store.set_hidden_tracks(&self.hidden);
        }
    }

    /// Hide if visible, unhide if hidden; returns whether it is now hidden
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.is_hidden(name) {
            self.unhide(name);
            false
        } else {
            self.hide(name);
            true
        }
    }

    /// Whether `name` is hidden
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// Flip the view filter; returns the new mode
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.mode = self.mode.flipped();
        self.mode
    }

    /// Current view filter
    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Number of hidden names
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Whether the current view includes `name`
    pub fn shows(&self, name: &str) -> bool {
        match self.mode {
            ViewMode::Visible => !self.is_hidden(name),
            ViewMode::Hidden => self.is_hidden(name),
        }
    }

    /// The hidden set
    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_persists_and_is_idempotent() {
        let store = ProgressStore::in_memory();
        let mut list = HiddenList::load(store.clone());

        list.hide("song");
        list.hide("song");
        assert_eq!(list.hidden_count(), 1);
        assert!(store.hidden_tracks().contains("song"));

        let reloaded = HiddenList::load(store.clone());
        assert!(reloaded.is_hidden("song"));

        list.unhide("song");
        list.unhide("song");
        assert!(store.hidden_tracks().is_empty());
    }

    #[test]
    fn toggle_moves_between_sides() {
        let mut list = HiddenList::load(ProgressStore::in_memory());

        assert!(list.toggle("song"));
        assert!(list.is_hidden("song"));
        assert!(!list.toggle("song"));
        assert!(!list.is_hidden("song"));
    }

    #[test]
    fn view_mode_filters_exclusively() {
        let mut list = HiddenList::load(ProgressStore::in_memory());
        list.hide("a");

        assert_eq!(list.view_mode(), ViewMode::Visible);
        assert!(!list.shows("a"));
        assert!(list.shows("b"));

        assert_eq!(list.toggle_view_mode(), ViewMode::Hidden);
        assert!(list.shows("a"));
        assert!(!list.shows("b"));
    }
}
