use eframe::egui;

use crate::gui::{
    error_modal::ErrorModal,
    modal::{
        Modal,
        ModalConfig,
    },
};

/// Work held back until the user agrees to drop unsaved edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NewStory,
    OpenDraft,
}

pub struct Modals {
    pub error: ErrorModal,
    pub discard: Modal<PendingAction>,
    pub brief: Modal<String>,
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            error: ErrorModal::new(),
            discard: Modal::new_with_data("Unsaved changes", PendingAction::NewStory),
            brief: Modal::new_with_data("Story Brief", String::new()).with_config(ModalConfig {
                resizable: true,
                min_size: egui::Vec2::new(420.0, 300.0),
                default_size: Some(egui::Vec2::new(560.0, 480.0)),
                show_overlay: false,
            }),
        }
    }
}
