mod characters;
mod plot_tools;
mod settings;
mod story;

use eframe::egui::{
    self,
    Ui,
};

use super::{
    actions::ActionQueue,
    theme::Theme,
    widgets::section,
};
use crate::core::{
    profile::StorySection,
    sections::SectionKey,
    StoryForm,
};

/// Draws the whole story form. Reads `form` only; edits go to `actions`.
pub fn story_form(
    ui: &mut Ui,
    form: &StoryForm,
    theme: &Theme,
    generating: bool,
    actions: &mut ActionQueue,
) {
    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.heading(theme.heading(ui.ctx(), "Story Parameters"));
        ui.add_space(8.0);

        for story_section in StorySection::ALL.iter().copied() {
            section(
                ui,
                SectionKey::Story(story_section),
                story_section.title(),
                form.sections(),
                actions,
                |ui, actions| story::story_section(ui, form.profile(), story_section, actions),
            );
        }

        let character_count = form.profile().characters.len();
        section(
            ui,
            SectionKey::Characters,
            format!("Characters ({character_count})"),
            form.sections(),
            actions,
            |ui, actions| characters::characters_section(ui, form, actions),
        );

        let item_count = form.profile().plot_tools.total_items();
        section(
            ui,
            SectionKey::PlotTools,
            format!("Plot Tools ({item_count})"),
            form.sections(),
            actions,
            |ui, actions| plot_tools::plot_tools_section(ui, form, actions),
        );

        section(
            ui,
            SectionKey::Generation,
            "Generation Settings",
            form.sections(),
            actions,
            |ui, actions| settings::generation_settings(ui, form, theme, generating, actions),
        );

        ui.add_space(24.0);
    });
}
