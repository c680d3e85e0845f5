use eframe::egui::{
    self,
    Ui,
};

use crate::{
    core::{
        character::{
            Character,
            CharacterField,
            CharacterGroup,
            MENTAL_HEALTH_TAGS,
        },
        FormAction,
        StoryForm,
    },
    gui::{
        actions::ActionQueue,
        widgets::{
            multi_select,
            text_input,
        },
    },
};

pub fn characters_section(ui: &mut Ui, form: &StoryForm, actions: &mut ActionQueue) {
    let can_remove = form.can_remove_character();

    for (index, character) in form.profile().characters.iter().enumerate() {
        let title = format!("{}. {}", index + 1, character.display_name());
        egui::CollapsingHeader::new(title)
            .id_salt(("character", character.id))
            .default_open(index == 0)
            .show(ui, |ui| {
                character_sheet(ui, character, actions);

                ui.add_space(6.0);
                let remove = ui
                    .add_enabled(can_remove, egui::Button::new("🗑 Remove character"))
                    .on_disabled_hover_text("A story needs at least one character");
                if remove.clicked() {
                    actions.push(FormAction::RemoveCharacter(character.id));
                }
            });
    }

    ui.add_space(6.0);
    if ui.button("➕ Add character").clicked() {
        actions.push(FormAction::AddCharacter);
    }
}

fn character_sheet(ui: &mut Ui, character: &Character, actions: &mut ActionQueue) {
    let id = character.id;

    for group in CharacterGroup::ALL.iter().copied() {
        egui::CollapsingHeader::new(group.title())
            .id_salt(("character", id, group))
            .default_open(group == CharacterGroup::Basics)
            .show(ui, |ui| {
                for field in CharacterField::in_group(group) {
                    let value = character.sheet.get(field);
                    if let Some(value) =
                        text_input(ui, ("character", id, field.key()), field.label(), value, field.kind())
                    {
                        actions.push(FormAction::UpdateCharacter { id, field, value });
                    }
                }

                if group == CharacterGroup::InnerWorld {
                    ui.label("Mental health tags");
                    if let Some(tag) =
                        multi_select(ui, MENTAL_HEALTH_TAGS, &character.mental_health_tags)
                    {
                        actions.push(FormAction::ToggleMentalHealthTag { id, tag });
                    }
                }
            });
    }
}
