use std::collections::BTreeMap;

use super::{
    plot_tools::PlotList,
    profile::StorySection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKey {
    Story(StorySection),
    Characters,
    PlotTools,
    PlotList(PlotList),
    Generation,
}

impl SectionKey {
    /// Every collapsible section, in display order.
    pub fn all() -> impl Iterator<Item = SectionKey> {
        StorySection::ALL
            .iter()
            .map(|s| SectionKey::Story(*s))
            .chain([SectionKey::Characters, SectionKey::PlotTools])
            .chain(PlotList::ALL.iter().map(|l| SectionKey::PlotList(*l)))
            .chain(std::iter::once(SectionKey::Generation))
    }

    fn starts_collapsed(self) -> bool {
        !matches!(self, SectionKey::Story(StorySection::CoreIdea))
    }
}

/// Collapsed/expanded flag for each section of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVisibility {
    collapsed: BTreeMap<SectionKey, bool>,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        let collapsed = SectionKey::all().map(|key| (key, key.starts_collapsed())).collect();
        Self { collapsed }
    }
}

impl SectionVisibility {
    pub fn is_collapsed(&self, key: SectionKey) -> bool {
        self.collapsed.get(&key).copied().unwrap_or_else(|| key.starts_collapsed())
    }

    pub fn is_open(&self, key: SectionKey) -> bool {
        !self.is_collapsed(key)
    }

    /// Flips one section and returns its new collapsed state.
    pub fn toggle(&mut self, key: SectionKey) -> bool {
        let entry = self.collapsed.entry(key).or_insert_with(|| key.starts_collapsed());
        *entry = !*entry;
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_core_idea_starts_open() {
        let visibility = SectionVisibility::default();
        for key in SectionKey::all() {
            let expected_open = key == SectionKey::Story(StorySection::CoreIdea);
            assert_eq!(visibility.is_open(key), expected_open, "{key:?}");
        }
    }

    #[test]
    fn toggle_twice_restores_and_leaves_others_alone() {
        let mut visibility = SectionVisibility::default();
        let before = visibility.clone();
        let key = SectionKey::PlotList(PlotList::Timebombs);

        assert!(!visibility.toggle(key));
        assert!(visibility.is_open(key));
        for other in SectionKey::all().filter(|k| *k != key) {
            assert_eq!(visibility.is_collapsed(other), before.is_collapsed(other));
        }

        visibility.toggle(key);
        assert_eq!(visibility, before);
    }

    #[test]
    fn section_keys_are_unique() {
        let keys: Vec<_> = SectionKey::all().collect();
        let unique: std::collections::BTreeSet<_> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(keys.len(), StorySection::ALL.len() + 2 + PlotList::ALL.len() + 1);
    }
}
