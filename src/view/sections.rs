//! Collapsible page sections, remembered across sessions.

use crate::view::prefs::Preferences;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Expanded,
    Collapsed,
}

/// Sections start expanded; the collapsed set is saved on every change.
#[derive(Debug, Clone)]
pub struct SectionToggle {
    collapsed: BTreeSet<String>,
    prefs: Preferences,
}

impl SectionToggle {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            collapsed: prefs.collapsed_sections(),
            prefs,
        }
    }

    pub fn state(&self, id: &str) -> SectionState {
        if self.collapsed.contains(id) {
            SectionState::Collapsed
        } else {
            SectionState::Expanded
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Flip `id`; returns the new state.
    pub fn toggle(&mut self, id: &str) -> SectionState {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
        self.save();
        self.state(id)
    }

    pub fn collapse(&mut self, id: &str) {
        if self.collapsed.insert(id.to_string()) {
            self.save();
        }
    }

    pub fn expand(&mut self, id: &str) {
        if self.collapsed.remove(id) {
            self.save();
        }
    }

    pub fn collapsed(&self) -> impl Iterator<Item = &str> {
        self.collapsed.iter().map(String::as_str)
    }

    fn save(&self) {
        self.prefs.set_collapsed_sections(&self.collapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips_through_prefs() {
        let prefs = Preferences::in_memory();
        let mut sections = SectionToggle::new(prefs.clone());
        assert_eq!(sections.state("favorites"), SectionState::Expanded);
        assert_eq!(sections.toggle("favorites"), SectionState::Collapsed);
        sections.collapse("predictions");

        let reloaded = SectionToggle::new(prefs.clone());
        assert!(reloaded.is_collapsed("favorites"));
        assert!(reloaded.is_collapsed("predictions"));

        assert_eq!(sections.toggle("favorites"), SectionState::Expanded);
        sections.expand("predictions");
        assert!(SectionToggle::new(prefs).collapsed().next().is_none());
    }
}
