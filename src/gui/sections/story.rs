use eframe::egui::Ui;

use crate::{
    core::{
        profile::{
            StoryField,
            StoryProfile,
            StorySection,
        },
        FormAction,
    },
    gui::{
        actions::ActionQueue,
        widgets::text_input,
    },
};

pub fn story_section(
    ui: &mut Ui,
    profile: &StoryProfile,
    section: StorySection,
    actions: &mut ActionQueue,
) {
    let required = section.is_required();
    if required {
        ui.weak("These fields are required before a book can be generated.");
    }

    for field in StoryField::in_group(section) {
        let label = if required { format!("{} *", field.label()) } else { field.label().to_string() };
        let value = profile.details.get(field);

        if let Some(value) = text_input(ui, ("story", field.key()), &label, value, field.kind()) {
            actions.push(FormAction::UpdateField { field, value });
        }
    }
}
