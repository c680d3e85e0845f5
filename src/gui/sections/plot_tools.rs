use eframe::egui::{
    self,
    Ui,
};

use crate::{
    core::{
        plot_tools::{
            PlotItem,
            PlotItemField,
            PlotList,
        },
        sections::SectionKey,
        FormAction,
        InputKind,
        StoryForm,
    },
    gui::{
        actions::ActionQueue,
        widgets::{
            section,
            text_input,
        },
    },
};

pub fn plot_tools_section(ui: &mut Ui, form: &StoryForm, actions: &mut ActionQueue) {
    ui.weak("Optional devices the writers will weave into the plot. Blank entries are ignored.");

    for list in PlotList::ALL.iter().copied() {
        let count = form.profile().plot_tools.items(list).len();
        let title = format!("{} ({count})", list.label());

        section(ui, SectionKey::PlotList(list), title, form.sections(), actions, |ui, actions| {
            plot_list(ui, form, list, actions);
        });
    }
}

fn plot_list(ui: &mut Ui, form: &StoryForm, list: PlotList, actions: &mut ActionQueue) {
    let can_remove = form.can_remove_from_list(list);

    for (index, item) in form.profile().plot_tools.items(list).iter().enumerate() {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong(format!("#{}", index + 1));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let remove = ui
                        .add_enabled(can_remove, egui::Button::new("🗑").small())
                        .on_hover_text("Remove")
                        .on_disabled_hover_text("This list keeps at least one entry");
                    if remove.clicked() {
                        actions.push(FormAction::RemoveFromList { list, id: item.id });
                    }
                });
            });

            plot_item(ui, list, item, actions);
        });
    }

    if ui.button("➕ Add").clicked() {
        actions.push(FormAction::AddToList { list, template: PlotItem::default() });
    }
}

fn plot_item(ui: &mut Ui, list: PlotList, item: &PlotItem, actions: &mut ActionQueue) {
    let id = item.id;
    let mut fields = vec![(PlotItemField::Content, list.content_label(), InputKind::Area)];
    if let Some((label, kind)) = list.detail() {
        fields.push((PlotItemField::Detail, label, kind));
    }

    for (field, label, kind) in fields {
        if let Some(value) = text_input(ui, (list.key(), id, field), label, item.get(field), kind) {
            actions.push(FormAction::UpdateListItem { list, id, field, value });
        }
    }
}
