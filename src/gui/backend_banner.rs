use eframe::egui;

use super::theme::Theme;
use crate::core::tasks::BackendHealth;

/// Strip under the menu bar shown while the backend cannot be reached.
pub struct BackendBanner;

impl BackendBanner {
    /// Returns true when the user clicked the banner to retry.
    pub fn show(ctx: &egui::Context, theme: &Theme, backend: &BackendHealth, api_root: &str) -> bool {
        let BackendHealth::Offline(_) = backend else {
            return false;
        };

        let mut clicked = false;

        egui::TopBottomPanel::top("backend_banner").exact_height(28.0).show(ctx, |ui| {
            let frame = egui::Frame::NONE.fill(theme.amber(ctx));

            frame.show(ui, |ui| {
                ui.vertical_centered_justified(|ui| {
                    let text = format!(
                        "⚠ Story backend unreachable at {api_root}. You can keep editing; click to retry."
                    );
                    let response = ui.add(
                        egui::Label::new(
                            egui::RichText::new(text).size(14.0).color(egui::Color32::BLACK),
                        )
                        .sense(egui::Sense::click()),
                    );

                    if response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }

                    clicked = response.clicked();
                });
            });
        });

        clicked
    }
}
