use eframe::egui::{
    self,
    containers,
};

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    theme::Theme,
};
use crate::core::tasks::BackendHealth;

/// What the menu needs to know about the app to enable its entries.
pub struct TopBarState<'a> {
    pub backend: &'a BackendHealth,
    pub draft_name: Option<&'a str>,
    pub dirty: bool,
    pub generating: bool,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        state: &TopBarState<'_>,
        actions: &mut ActionQueue,
    ) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);

                ui.menu_button("File", |ui| {
                    if ui.button("New Story").clicked() {
                        actions.push(UiAction::NewStory);
                    }
                    if ui.button("Open Draft…").clicked() {
                        actions.push(UiAction::OpenDraft);
                    }
                    ui.separator();
                    if ui.button("Save Draft").clicked() {
                        actions.push(UiAction::SaveDraft);
                    }
                    if ui.button("Save Draft As…").clicked() {
                        actions.push(UiAction::SaveDraftAs);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        actions.push(UiAction::Quit);
                    }
                });

                ui.menu_button("Story", |ui| {
                    if ui.button("Preview Brief").clicked() {
                        actions.push(UiAction::ShowBrief);
                    }
                    if ui.add_enabled(!state.generating, egui::Button::new("Generate Book")).clicked()
                    {
                        actions.push(UiAction::Generate);
                    }
                });

                ui.separator();
                let name = state.draft_name.unwrap_or("Untitled story");
                let marker = if state.dirty { " •" } else { "" };
                ui.label(egui::RichText::new(format!("{name}{marker}")).color(theme.muted(ctx)));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    Self::show_backend_status(ui, theme, state.backend, actions);
                });
            });
        });
    }

    fn show_backend_status(
        ui: &mut egui::Ui,
        theme: &Theme,
        backend: &BackendHealth,
        actions: &mut ActionQueue,
    ) {
        let ctx = ui.ctx().clone();
        let (color, tooltip) = match backend {
            BackendHealth::Unknown => (theme.muted(&ctx), "Checking backend…".to_string()),
            BackendHealth::Online { system_ready: true, total_agents } => {
                (theme.green(&ctx), format!("Backend online, {total_agents} agents ready"))
            }
            BackendHealth::Online { system_ready: false, .. } => {
                (theme.amber(&ctx), "Backend online, agents not ready".to_string())
            }
            BackendHealth::Offline(reason) => (theme.red(&ctx), format!("Backend offline: {reason}")),
        };

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            let dot = ui
                .add(
                    egui::Label::new(egui::RichText::new("●").small().color(color))
                        .sense(egui::Sense::click()),
                )
                .on_hover_text(format!("{tooltip}\nClick to check again"));
            ui.small("Backend").on_hover_text(&tooltip);
            if dot.clicked() {
                actions.push(UiAction::CheckBackend);
            }
        });
    }
}
