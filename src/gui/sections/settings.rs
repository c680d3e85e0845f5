use eframe::egui::{
    self,
    Ui,
};

use crate::{
    core::{
        profile::NumberField,
        utils::format_thousands,
        FormAction,
        StoryForm,
    },
    gui::{
        actions::{
            ActionQueue,
            UiAction,
        },
        theme::Theme,
        widgets::number_slider,
    },
};

/// Length sliders, the estimate they produce and the generate button.
pub fn generation_settings(
    ui: &mut Ui,
    form: &StoryForm,
    theme: &Theme,
    generating: bool,
    actions: &mut ActionQueue,
) {
    let profile = form.profile();

    egui::Grid::new("generation_settings").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
        for field in [NumberField::TotalChapters, NumberField::MinWordsPerChapter] {
            ui.label(field.label());
            if let Some(value) = number_slider(ui, profile.number(field), field.range()) {
                actions.push(FormAction::UpdateNumber { field, value });
            }
            ui.end_row();
        }
    });

    ui.add_space(6.0);
    ui.label(format!(
        "Estimated length: {} words",
        format_thousands(form.estimated_word_count())
    ));

    let missing = profile.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.label()).collect();
        ui.colored_label(theme.amber(ui.ctx()), format!("Still needed: {}", names.join(", ")));
    }

    ui.add_space(6.0);
    let ready = missing.is_empty() && !generating;
    let button = egui::Button::new(theme.heading(ui.ctx(), "📖 Generate Book"));
    let response = ui.add_enabled(ready, button).on_disabled_hover_text(if generating {
        "A book is already being generated"
    } else {
        "Fill in the core story idea first"
    });
    if response.clicked() {
        actions.push(UiAction::Generate);
    }
}
