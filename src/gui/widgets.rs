//! Stateless input helpers. Each takes the current value and returns
//! `Some(new_value)` only on the frame the user changed it.

use std::{
    collections::BTreeSet,
    hash::Hash,
    ops::RangeInclusive,
};

use eframe::egui::{
    self,
    SliderClamping,
    Ui,
    WidgetText,
};

use super::actions::ActionQueue;
use crate::core::{
    sections::{
        SectionKey,
        SectionVisibility,
    },
    utils::format_thousands,
    FormAction,
    InputKind,
};

const NO_CHOICE: &str = "Not set";
const AREA_ROWS: usize = 3;

/// Text editors take an `id_salt` so focus and undo state stay with the item
/// they belong to when a list entry above them is removed.
pub fn text_line(ui: &mut Ui, id_salt: impl Hash, value: &str) -> Option<String> {
    let mut text = value.to_owned();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text).id_salt(id_salt).desired_width(f32::INFINITY),
    );
    response.changed().then_some(text)
}

pub fn text_area(ui: &mut Ui, id_salt: impl Hash, value: &str) -> Option<String> {
    let mut text = value.to_owned();
    let response = ui.add(
        egui::TextEdit::multiline(&mut text)
            .id_salt(id_salt)
            .desired_rows(AREA_ROWS)
            .desired_width(f32::INFINITY),
    );
    response.changed().then_some(text)
}

/// Single-select drop-down. A value not in `options` (e.g. from an older draft)
/// is still shown as the current selection.
pub fn choice(
    ui: &mut Ui,
    id_salt: impl Hash,
    value: &str,
    options: &[&str],
) -> Option<String> {
    let mut selected = value.to_owned();
    let shown = if value.is_empty() { NO_CHOICE } else { value };

    egui::ComboBox::from_id_salt(id_salt).selected_text(shown).width(220.0).show_ui(ui, |ui| {
        ui.selectable_value(&mut selected, String::new(), NO_CHOICE);
        for option in options {
            ui.selectable_value(&mut selected, option.to_string(), *option);
        }
    });

    (selected != value).then_some(selected)
}

/// Checkbox group; returns the option the user toggled.
pub fn multi_select(ui: &mut Ui, options: &[&str], selected: &BTreeSet<String>) -> Option<String> {
    let mut toggled = None;
    ui.horizontal_wrapped(|ui| {
        for option in options {
            let mut checked = selected.contains(*option);
            if ui.checkbox(&mut checked, *option).changed() {
                toggled = Some(option.to_string());
            }
        }
    });
    toggled
}

pub fn number_slider(ui: &mut Ui, value: u32, range: RangeInclusive<u32>) -> Option<u32> {
    let mut number = value;
    let response = ui.add(
        egui::Slider::new(&mut number, range)
            .clamping(SliderClamping::Always)
            .custom_formatter(|n, _| format_thousands(n.round() as u64))
            .custom_parser(parse_thousands),
    );
    (response.changed() && number != value).then_some(number)
}

/// Labelled input for a text field of the given kind.
pub fn text_input(
    ui: &mut Ui,
    id_salt: impl Hash,
    label: &str,
    value: &str,
    kind: InputKind,
) -> Option<String> {
    ui.label(label);
    let changed = match kind {
        InputKind::Line => text_line(ui, id_salt, value),
        InputKind::Area => text_area(ui, id_salt, value),
        InputKind::Choice(options) => choice(ui, id_salt, value, options),
    };
    ui.add_space(4.0);
    changed
}

/// Collapsible section whose open state lives in `SectionVisibility`.
/// Clicking the header queues a toggle instead of flipping egui's own state.
pub fn section(
    ui: &mut Ui,
    key: SectionKey,
    title: impl Into<WidgetText>,
    sections: &SectionVisibility,
    actions: &mut ActionQueue,
    add_contents: impl FnOnce(&mut Ui, &mut ActionQueue),
) {
    let response = egui::CollapsingHeader::new(title)
        .id_salt(key)
        .open(Some(sections.is_open(key)))
        .show(ui, |ui| add_contents(ui, actions));

    if response.header_response.clicked() {
        actions.push(FormAction::ToggleSection(key));
    }
}

fn parse_thousands(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '_' | ' ')).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_text_accepts_separators() {
        assert_eq!(parse_thousands("22,500"), Some(22_500.0));
        assert_eq!(parse_thousands(" 1 000 "), Some(1_000.0));
        assert_eq!(parse_thousands("900"), Some(900.0));
        assert_eq!(parse_thousands("lots"), None);
    }

    #[test]
    fn text_editors_are_keyed_by_salt() {
        let salts = [("timebombs", 7_u64), ("timebombs", 8_u64)];
        let mut stored = Vec::new();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                text_line(ui, salts[0], "Dam breaks");
                text_area(ui, salts[1], "A cracked bell");
                stored = salts
                    .iter()
                    .map(|salt| egui::TextEdit::load_state(ctx, ui.make_persistent_id(salt)).is_some())
                    .collect();
            });
        });

        assert_eq!(stored, [true, true]);
    }
}
