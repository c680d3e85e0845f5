use std::collections::HashSet;

use super::{
    character::{
        Character,
        CharacterField,
    },
    ids::{
        IdGenerator,
        ItemId,
    },
    plot_tools::{
        PlotItem,
        PlotItemField,
        PlotList,
    },
    profile::{
        NumberField,
        StoryField,
        StoryProfile,
    },
    sections::{
        SectionKey,
        SectionVisibility,
    },
};

/// A single edit to the form, queued by widgets and applied after the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    UpdateField { field: StoryField, value: String },
    UpdateNumber { field: NumberField, value: u32 },
    ToggleSection(SectionKey),
    AddToList { list: PlotList, template: PlotItem },
    RemoveFromList { list: PlotList, id: ItemId },
    UpdateListItem { list: PlotList, id: ItemId, field: PlotItemField, value: String },
    AddCharacter,
    RemoveCharacter(ItemId),
    UpdateCharacter { id: ItemId, field: CharacterField, value: String },
    ToggleMentalHealthTag { id: ItemId, tag: String },
}

/// Owns the story being edited and is the only thing that mutates it.
#[derive(Debug, Clone)]
pub struct StoryForm {
    profile: StoryProfile,
    sections: SectionVisibility,
    ids: IdGenerator,
}

impl Default for StoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryForm {
    pub fn new() -> Self {
        let mut form = Self {
            profile: StoryProfile::default(),
            sections: SectionVisibility::default(),
            ids: IdGenerator::new(),
        };
        form.seed_minimums();
        form
    }

    pub fn profile(&self) -> &StoryProfile {
        &self.profile
    }

    pub fn sections(&self) -> &SectionVisibility {
        &self.sections
    }

    pub fn update_field(&mut self, field: StoryField, value: String) {
        self.profile.details.set(field, value);
    }

    pub fn update_number(&mut self, field: NumberField, value: u32) {
        self.profile.set_number(field, value);
    }

    pub fn toggle_section(&mut self, key: SectionKey) -> bool {
        self.sections.toggle(key)
    }

    /// Appends a copy of `template` under a fresh identifier.
    pub fn add_to_list(&mut self, list: PlotList, template: PlotItem) -> ItemId {
        let id = self.ids.next_id();
        self.profile.plot_tools.items_mut(list).push(PlotItem { id, ..template });
        id
    }

    pub fn remove_from_list(&mut self, list: PlotList, id: ItemId) -> bool {
        let items = self.profile.plot_tools.items_mut(list);
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    pub fn can_remove_from_list(&self, list: PlotList) -> bool {
        self.profile.plot_tools.items(list).len() > list.min_items()
    }

    pub fn update_list_item(
        &mut self,
        list: PlotList,
        id: ItemId,
        field: PlotItemField,
        value: String,
    ) -> bool {
        match self.profile.plot_tools.items_mut(list).iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn add_character(&mut self) -> ItemId {
        let id = self.ids.next_id();
        self.profile.characters.push(Character::new(id));
        id
    }

    /// Refused while only one character is left.
    pub fn remove_character(&mut self, id: ItemId) -> bool {
        if !self.can_remove_character() {
            return false;
        }
        let before = self.profile.characters.len();
        self.profile.characters.retain(|c| c.id != id);
        self.profile.characters.len() != before
    }

    pub fn can_remove_character(&self) -> bool {
        self.profile.characters.len() > 1
    }

    pub fn update_character(&mut self, id: ItemId, field: CharacterField, value: String) -> bool {
        match self.character_mut(id) {
            Some(character) => {
                character.sheet.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn toggle_mental_health_tag(&mut self, id: ItemId, tag: &str) -> bool {
        match self.character_mut(id) {
            Some(character) => {
                character.toggle_tag(tag);
                true
            }
            None => false,
        }
    }

    pub fn estimated_word_count(&self) -> u64 {
        self.profile.estimated_word_count()
    }

    pub fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::UpdateField { field, value } => self.update_field(field, value),
            FormAction::UpdateNumber { field, value } => self.update_number(field, value),
            FormAction::ToggleSection(key) => {
                self.toggle_section(key);
            }
            FormAction::AddToList { list, template } => {
                self.add_to_list(list, template);
            }
            FormAction::RemoveFromList { list, id } => {
                self.remove_from_list(list, id);
            }
            FormAction::UpdateListItem { list, id, field, value } => {
                self.update_list_item(list, id, field, value);
            }
            FormAction::AddCharacter => {
                self.add_character();
            }
            FormAction::RemoveCharacter(id) => {
                self.remove_character(id);
            }
            FormAction::UpdateCharacter { id, field, value } => {
                self.update_character(id, field, value);
            }
            FormAction::ToggleMentalHealthTag { id, tag } => {
                self.toggle_mental_health_tag(id, &tag);
            }
        }
    }

    /// Starts over with an empty story. Section visibility is kept.
    pub fn reset(&mut self) {
        self.profile = StoryProfile::default();
        self.seed_minimums();
    }

    /// Replaces the story with one loaded from a draft.
    ///
    /// The id generator moves past every stored identifier, and any duplicate
    /// identifier inside a sequence is given a fresh one. If the draft holds an
    /// id too large to move past, every id in it is renumbered.
    pub fn load(&mut self, profile: StoryProfile) {
        let refused = profile.item_ids().filter(|id| !self.ids.observe(*id)).count();
        self.profile = profile;

        if refused > 0 {
            tracing::warn!("Draft holds {refused} out-of-range ids; renumbering");
            self.renumber_items();
        } else {
            self.repair_duplicate_ids();
        }

        let (chapters, words) = (self.profile.total_chapters, self.profile.min_words_per_chapter);
        self.profile.set_number(NumberField::TotalChapters, chapters);
        self.profile.set_number(NumberField::MinWordsPerChapter, words);
        self.seed_minimums();
    }

    fn renumber_items(&mut self) {
        for character in &mut self.profile.characters {
            character.id = self.ids.next_id();
        }
        for list in PlotList::ALL {
            for item in self.profile.plot_tools.items_mut(*list) {
                item.id = self.ids.next_id();
            }
        }
    }

    fn repair_duplicate_ids(&mut self) {
        let mut seen = HashSet::new();
        for character in &mut self.profile.characters {
            if !seen.insert(character.id) {
                character.id = self.ids.next_id();
            }
        }
        for list in PlotList::ALL {
            let mut seen = HashSet::new();
            for item in self.profile.plot_tools.items_mut(*list) {
                if !seen.insert(item.id) {
                    item.id = self.ids.next_id();
                }
            }
        }
    }

    fn character_mut(&mut self, id: ItemId) -> Option<&mut Character> {
        self.profile.characters.iter_mut().find(|c| c.id == id)
    }

    fn seed_minimums(&mut self) {
        if self.profile.characters.is_empty() {
            self.add_character();
        }
        for list in PlotList::ALL {
            while self.profile.plot_tools.items(*list).len() < list.min_items() {
                self.add_to_list(*list, PlotItem::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::format_thousands;

    fn form_with_items(list: PlotList, count: usize) -> (StoryForm, Vec<ItemId>) {
        let mut form = StoryForm::new();
        let ids = (0..count)
            .map(|i| {
                let template = PlotItem { content: format!("item {i}"), ..PlotItem::default() };
                form.add_to_list(list, template)
            })
            .collect();
        (form, ids)
    }

    #[test]
    fn new_form_starts_with_one_character_and_seeded_lists() {
        let form = StoryForm::new();
        assert_eq!(form.profile().characters.len(), 1);
        for list in PlotList::ALL {
            assert_eq!(form.profile().plot_tools.items(*list).len(), list.min_items());
        }
    }

    #[test]
    fn add_to_list_grows_by_one_with_a_fresh_id() {
        let (mut form, _) = form_with_items(PlotList::Timebombs, 3);
        let before: Vec<ItemId> =
            form.profile().plot_tools.items(PlotList::Timebombs).iter().map(|i| i.id).collect();

        let template = PlotItem { id: before[0], content: "tick".to_string(), ..PlotItem::default() };
        let id = form.add_to_list(PlotList::Timebombs, template);

        let items = form.profile().plot_tools.items(PlotList::Timebombs);
        assert_eq!(items.len(), before.len() + 1);
        assert!(!before.contains(&id));
        assert_eq!(items.last().map(|i| i.content.as_str()), Some("tick"));
    }

    #[test]
    fn remove_from_list_drops_exactly_that_item() {
        let (mut form, ids) = form_with_items(PlotList::LocationStakes, 3);

        assert!(form.remove_from_list(PlotList::LocationStakes, ids[1]));
        let remaining: Vec<ItemId> =
            form.profile().plot_tools.items(PlotList::LocationStakes).iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);

        let snapshot = form.profile().clone();
        assert!(!form.remove_from_list(PlotList::LocationStakes, ids[1]));
        assert_eq!(form.profile(), &snapshot);
    }

    #[test]
    fn data_layer_does_not_enforce_list_minimum() {
        let mut form = StoryForm::new();
        let id = form.profile().plot_tools.items(PlotList::RedHerrings)[0].id;
        assert!(!form.can_remove_from_list(PlotList::RedHerrings));
        assert!(form.remove_from_list(PlotList::RedHerrings, id));
        assert!(form.profile().plot_tools.items(PlotList::RedHerrings).is_empty());
    }

    #[test]
    fn update_list_item_touches_only_the_target() {
        let (mut form, ids) = form_with_items(PlotList::NpcCatalysts, 3);
        let before = form.profile().clone();

        assert!(form.update_list_item(
            PlotList::NpcCatalysts,
            ids[2],
            PlotItemField::Detail,
            "starts the riot".to_string()
        ));

        let mut expected = before;
        expected.plot_tools.npc_catalysts[2].detail = "starts the riot".to_string();
        assert_eq!(form.profile(), &expected);
    }

    #[test]
    fn update_character_touches_only_the_target() {
        let mut form = StoryForm::new();
        let second = form.add_character();
        let before = form.profile().clone();

        assert!(form.update_character(second, CharacterField::Name, "Ilse".to_string()));

        let mut expected = before;
        expected.characters[1].sheet.name = "Ilse".to_string();
        assert_eq!(form.profile(), &expected);
        assert!(!form.update_character(ItemId(1), CharacterField::Name, "ghost".to_string()));
    }

    #[test]
    fn last_character_cannot_be_removed() {
        let mut form = StoryForm::new();
        let only = form.profile().characters[0].id;
        assert!(!form.remove_character(only));
        assert_eq!(form.profile().characters.len(), 1);

        let second = form.add_character();
        assert!(form.remove_character(only));
        assert_eq!(form.profile().characters[0].id, second);
    }

    #[test]
    fn toggle_section_twice_restores() {
        let mut form = StoryForm::new();
        let key = SectionKey::Characters;
        let before = form.sections().is_collapsed(key);
        form.toggle_section(key);
        assert_ne!(form.sections().is_collapsed(key), before);
        form.toggle_section(key);
        assert_eq!(form.sections().is_collapsed(key), before);
    }

    #[test]
    fn word_estimate_follows_chapter_count() {
        let mut form = StoryForm::new();
        form.apply(FormAction::UpdateNumber { field: NumberField::TotalChapters, value: 25 });
        assert_eq!(form.estimated_word_count(), 22_500);
        assert_eq!(format_thousands(form.estimated_word_count()), "22,500");
    }

    #[test]
    fn apply_routes_every_action() {
        let mut form = StoryForm::new();
        let character = form.profile().characters[0].id;

        form.apply(FormAction::UpdateField {
            field: StoryField::MainPremise,
            value: "A city that forgets".to_string(),
        });
        form.apply(FormAction::AddToList {
            list: PlotList::PlotTwistsByRole,
            template: PlotItem { detail: "goal".to_string(), ..PlotItem::default() },
        });
        form.apply(FormAction::ToggleMentalHealthTag { id: character, tag: "PTSD".to_string() });
        form.apply(FormAction::AddCharacter);

        let profile = form.profile();
        assert_eq!(profile.details.main_premise, "A city that forgets");
        assert_eq!(profile.plot_tools.plot_twists_by_role.len(), 2);
        assert!(profile.characters[0].mental_health_tags.contains("PTSD"));
        assert_eq!(profile.characters.len(), 2);
    }

    #[test]
    fn load_advances_ids_and_repairs_duplicates() {
        let mut draft = StoryProfile::default();
        let far = ItemId(u64::MAX / 4);
        draft.characters = vec![Character::new(far), Character::new(far)];
        draft.plot_tools.timebombs = vec![PlotItem::new(ItemId(5))];
        draft.total_chapters = 0;

        let mut form = StoryForm::new();
        form.load(draft);

        let ids: Vec<ItemId> = form.profile().characters.iter().map(|c| c.id).collect();
        assert_eq!(ids[0], far);
        assert!(ids[1] > far);
        assert!(form.add_character() > ids[1]);
        assert!(form.add_to_list(PlotList::Timebombs, PlotItem::default()) > far);
        assert_eq!(form.profile().total_chapters, 1);
        assert_eq!(form.profile().plot_tools.red_herrings.len(), 1);
    }

    #[test]
    fn load_renumbers_draft_with_out_of_range_ids() {
        let mut draft = StoryProfile::default();
        let top = ItemId(u64::MAX);
        draft.characters = vec![Character::new(top), Character::new(ItemId(7))];
        draft.plot_tools.timebombs = vec![PlotItem::new(top), PlotItem::new(ItemId(8))];

        let mut form = StoryForm::new();
        form.load(draft);

        let profile = form.profile();
        let mut ids: Vec<ItemId> = profile.item_ids().collect();
        assert!(!ids.contains(&top));
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), profile.item_ids().count());

        let added = form.add_character();
        assert!(!ids.contains(&added));
        assert!(form.add_to_list(PlotList::Timebombs, PlotItem::default()) > added);
    }

    #[test]
    fn reset_gives_a_fresh_story() {
        let mut form = StoryForm::new();
        form.update_field(StoryField::Genres, "noir".to_string());
        form.add_character();
        form.reset();
        assert!(form.profile().details.genres.is_empty());
        assert_eq!(form.profile().characters.len(), 1);
    }
}
