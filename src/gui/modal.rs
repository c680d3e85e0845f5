use eframe::egui;

/// A window carrying a payload of type `T`, e.g. the action waiting behind a
/// confirmation or the text shown in a preview.
pub struct Modal<T> {
    open: bool,
    title: String,
    data: T,
    config: ModalConfig,
}

#[derive(Clone)]
pub struct ModalConfig {
    pub resizable: bool,
    pub min_size: egui::Vec2,
    pub default_size: Option<egui::Vec2>,
    /// Dim the rest of the window and close on a click outside.
    pub show_overlay: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            resizable: false,
            min_size: egui::Vec2::new(300.0, 120.0),
            default_size: None,
            show_overlay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalResult<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> Modal<T> {
    pub fn new_with_data(title: impl Into<String>, data: T) -> Self {
        Self { open: false, title: title.into(), data, config: ModalConfig::default() }
    }

    pub fn with_config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the payload and opens the window.
    pub fn open_with(&mut self, data: T) {
        self.data = data;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }


    /// Draws the window. Any result returned by `content` closes it.
    pub fn show<F>(&mut self, ctx: &egui::Context, content: F) -> Option<ModalResult<T>>
    where
        F: FnOnce(&mut egui::Ui, &T) -> Option<ModalResult<T>>,
    {
        if !self.open {
            return None;
        }

        let clicked_outside = self.config.show_overlay && self.show_overlay(ctx);

        let mut window = egui::Window::new(&self.title)
            .collapsible(false)
            .resizable(self.config.resizable)
            .min_size(self.config.min_size)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO);

        if let Some(size) = self.config.default_size {
            window = window.default_size(size);
        }

        let mut still_open = true;
        let data = &self.data;
        let result = window
            .open(&mut still_open)
            .show(ctx, |ui| content(ui, data))
            .and_then(|response| response.inner)
            .flatten();

        let result = match result {
            Some(result) => Some(result),
            None if clicked_outside || !still_open => Some(ModalResult::Cancelled),
            None => None,
        };

        if result.is_some() {
            self.open = false;
        }
        result
    }

    fn show_overlay(&self, ctx: &egui::Context) -> bool {
        egui::Area::new(egui::Id::new("modal_overlay").with(&self.title))
            .order(egui::Order::Background)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                let (_rect, response) =
                    ui.allocate_exact_size(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));
                response.clicked()
            })
            .inner
    }
}

pub fn action_buttons<T>(
    ui: &mut egui::Ui,
    data: &T,
    confirm_text: &str,
    cancel_text: &str,
) -> Option<ModalResult<T>>
where
    T: Clone,
{
    ui.horizontal(|ui| {
        if ui.button(confirm_text).clicked() {
            Some(ModalResult::Confirmed(data.clone()))
        } else if ui.button(cancel_text).clicked() {
            Some(ModalResult::Cancelled)
        } else {
            None
        }
    })
    .inner
}

pub fn confirmation_dialog<T: Clone>(
    modal: &mut Modal<T>,
    ctx: &egui::Context,
    message: &str,
    confirm_text: &str,
) -> Option<ModalResult<T>> {
    modal.show(ctx, |ui, data| {
        ui.label(message);
        ui.add_space(10.0);
        action_buttons(ui, data, confirm_text, "Cancel")
    })
}
