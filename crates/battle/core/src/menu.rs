//! Command menu model: a titled list of entries, some locked, one selected.
//!
//! Selection never lands on a locked entry while an unlocked one exists.
//! Locking the selected entry pushes the selection forward; locking every
//! entry leaves the selection where it was.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuEntry {
    pub label: String,
    pub locked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
    title: String,
    entries: ArrayVec<MenuEntry, { BattleConfig::MAX_MENU_ENTRIES }>,
    selection: usize,
}

impl Menu {
    /// Builds a menu with every entry unlocked and the first selected.
    /// Labels beyond the entry capacity are dropped.
    pub fn new(title: impl Into<String>, labels: impl IntoIterator<Item = String>) -> Self {
        let entries = labels
            .into_iter()
            .take(BattleConfig::MAX_MENU_ENTRIES)
            .map(|label| MenuEntry {
                label,
                locked: false,
            })
            .collect();
        Self {
            title: title.into(),
            entries,
            selection: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Locks or unlocks an entry. Out-of-range indexes are ignored. Locking
    /// the selected entry advances the selection to the next unlocked one.
    pub fn set_locked(&mut self, index: usize, locked: bool) {
        if index >= self.entries.len() {
            return;
        }
        self.entries[index].locked = locked;
        if locked && self.selection == index {
            self.next();
        }
    }

    /// Moves the selection forward to the next unlocked entry, wrapping.
    /// Returns true when the selection moved.
    pub fn next(&mut self) -> bool {
        let len = self.entries.len();
        for step in 1..len {
            let index = (self.selection + step) % len;
            if self.select(index) {
                return true;
            }
        }
        false
    }

    /// Moves the selection backward to the previous unlocked entry, wrapping.
    pub fn previous(&mut self) -> bool {
        let len = self.entries.len();
        for step in 1..len {
            let index = (self.selection + len - step) % len;
            if self.select(index) {
                return true;
            }
        }
        false
    }

    fn select(&mut self, index: usize) -> bool {
        if self.entries[index].locked {
            return false;
        }
        self.selection = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(labels: &[&str]) -> Menu {
        Menu::new("Commands", labels.iter().map(|s| s.to_string()))
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut m = menu(&["Move", "Action", "Wait"]);
        assert!(m.next());
        assert_eq!(m.selection(), 1);
        assert!(m.next());
        assert_eq!(m.selection(), 2);
        assert!(m.next());
        assert_eq!(m.selection(), 0);
        assert!(m.previous());
        assert_eq!(m.selection(), 2);
    }

    #[test]
    fn cycling_skips_locked_entries() {
        let mut m = menu(&["Move", "Action", "Wait"]);
        m.set_locked(1, true);
        assert!(m.next());
        assert_eq!(m.selection(), 2);
        assert!(m.previous());
        assert_eq!(m.selection(), 0);
    }

    #[test]
    fn locking_the_selected_entry_advances() {
        let mut m = menu(&["Move", "Action", "Wait"]);
        m.set_locked(0, true);
        assert_eq!(m.selection(), 1);
    }

    #[test]
    fn locking_every_entry_keeps_selection() {
        let mut m = menu(&["Move", "Action"]);
        m.set_locked(1, true);
        m.set_locked(0, true);
        assert_eq!(m.selection(), 0);
        assert!(!m.next());
        assert_eq!(m.selection(), 0);
    }
}
