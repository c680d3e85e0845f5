mod modals;

use std::{
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui;
use modals::{
    Modals,
    PendingAction,
};

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    backend_banner::BackendBanner,
    generation::{
        GenerationView,
        ProgressOutcome,
    },
    message_overlay::MessageOverlay,
    modal::{
        action_buttons,
        confirmation_dialog,
        ModalResult,
    },
    sections,
    theme::{
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarState,
    },
};
use crate::{
    api::{
        BackendClient,
        GenerationPhase,
    },
    config::AppConfig,
    core::{
        brief::story_brief,
        tasks::{
            BackendHealth,
            TaskManager,
            TaskResult,
        },
        utils::Interval,
        BookgenError,
        FormAction,
        StoryForm,
    },
    persistence::{
        self,
        UiSettings,
    },
};

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_DRAFT_NAME: &str = "story-draft.json";

pub struct BookgenApp {
    // Story
    form: StoryForm,
    draft_path: Option<PathBuf>,
    dirty: bool,

    // Configuration
    settings: UiSettings,

    // UI State
    theme: Theme,
    actions: ActionQueue,
    message_overlay: MessageOverlay,
    generation: GenerationView,
    modals: Modals,

    // Backend
    backend: BackendHealth,
    health_check: Interval,
    task_manager: TaskManager,
}

impl BookgenApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig) -> Result<Self, BookgenError> {
        let mut task_manager = TaskManager::new(BackendClient::new(config)?)?;
        let ctx = cc.egui_ctx.clone();
        task_manager.set_waker(move || ctx.request_repaint());

        let app = Self {
            form: StoryForm::new(),
            draft_path: None,
            dirty: false,

            settings: UiSettings::load(),

            theme: Theme::manuscript(),
            actions: ActionQueue::new(),
            message_overlay: MessageOverlay::new(),
            generation: GenerationView::new(),
            modals: Modals::default(),

            backend: BackendHealth::Unknown,
            health_check: Interval::new(HEALTH_CHECK_INTERVAL),
            task_manager,
        };

        app.setup_theme(&cc.egui_ctx);
        tracing::info!("Talking to the story backend at {}", config.api_root());

        Ok(app)
    }

    fn setup_theme(&self, ctx: &egui::Context) {
        set_theme(ctx, &self.theme);
        ctx.set_theme(if self.settings.dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
    }

    fn draft_name(&self) -> Option<String> {
        self.draft_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

impl eframe::App for BookgenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for result in self.task_manager.poll_results() {
            self.handle_task_result(result);
        }

        let now = Instant::now();
        self.update_backend_status(now);
        if let Some(session_id) = self.generation.take_poll(now) {
            self.task_manager.poll_progress(session_id);
        }

        let draft_name = self.draft_name();
        let top_bar = TopBarState {
            backend: &self.backend,
            draft_name: draft_name.as_deref(),
            dirty: self.dirty,
            generating: self.generation.is_running(),
        };
        TopBar::show(ctx, &self.theme, &top_bar, &mut self.actions);

        let api_root = self.task_manager.client().api_root();
        if BackendBanner::show(ctx, &self.theme, &self.backend, api_root) {
            self.actions.push(UiAction::CheckBackend);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            sections::story_form(
                ui,
                &self.form,
                &self.theme,
                self.generation.is_running(),
                &mut self.actions,
            );
        });

        self.generation.show(ctx, &self.theme, &mut self.actions);
        self.show_modals(ctx);
        self.message_overlay.show(ctx, &self.theme);

        let actions: Vec<UiAction> = self.actions.drain().collect();
        for action in actions {
            self.handle_action(action, ctx);
        }

        self.sync_theme_setting(ctx);

        ctx.request_repaint_after(self.health_check.remaining(now));
        if let Some(delay) = self.generation.repaint_after(now) {
            ctx.request_repaint_after(delay);
        }
    }
}

impl BookgenApp {
    fn handle_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::Form(action) => {
                let edits_story = !matches!(action, FormAction::ToggleSection(_));
                self.form.apply(action);
                self.dirty |= edits_story;
            }

            UiAction::NewStory => self.confirm_discard(PendingAction::NewStory),
            UiAction::OpenDraft => self.confirm_discard(PendingAction::OpenDraft),
            UiAction::SaveDraft => match self.draft_path.clone() {
                Some(path) => self.save_draft_to(path),
                None => self.save_draft_as(),
            },
            UiAction::SaveDraftAs => self.save_draft_as(),

            UiAction::Generate => self.generate(),
            UiAction::CancelGeneration => {
                let running = self.generation.session().filter(|s| s.is_running());
                if let Some(session_id) = running.map(|s| s.id.clone()) {
                    self.generation.mark_cancel_requested();
                    self.task_manager.cancel(session_id);
                }
            }
            UiAction::RefreshPreview => {
                if let Some(session) = self.generation.session() {
                    self.task_manager.fetch_preview(session.id.clone());
                }
            }
            UiAction::SaveDocument => self.save_document(),
            UiAction::CloseGeneration => self.generation.close(),

            UiAction::ShowBrief => self.modals.brief.open_with(story_brief(self.form.profile())),
            UiAction::CheckBackend => {
                self.backend = BackendHealth::Unknown;
                self.health_check.reset();
            }
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::BackendStatus(health) => {
                if health.is_online() != self.backend.is_online() {
                    tracing::info!("Backend status: {health:?}");
                }
                self.backend = health;
            }

            TaskResult::GenerationStarted(result) => {
                self.message_overlay.clear_message();
                match result {
                    Ok(started) => self.generation.start(&started),
                    Err(e) => self.modals.error.show_error(
                        "Generation Error",
                        "The story could not be submitted to the backend.",
                        Some(e),
                    ),
                }
            }

            TaskResult::Progress { session_id, result } => {
                match self.generation.apply_progress(&session_id, result) {
                    ProgressOutcome::Finished(GenerationPhase::Completed) => {
                        tracing::info!("Generation session {session_id} completed");
                        self.task_manager.fetch_preview(session_id.clone());
                        self.task_manager.fetch_download_info(session_id);
                    }
                    ProgressOutcome::Finished(GenerationPhase::Cancelled) => {
                        tracing::info!("Generation session {session_id} cancelled");
                    }
                    ProgressOutcome::Finished(phase) => {
                        let reason = self
                            .generation
                            .session()
                            .and_then(|s| s.progress.as_ref())
                            .and_then(|p| p.error())
                            .unwrap_or("The backend reported an error.")
                            .to_string();
                        self.modals.error.show_error(
                            "Generation Failed",
                            format!("Generation stopped ({}).", phase.label()),
                            Some(reason),
                        );
                    }
                    ProgressOutcome::Lost(e) => self.modals.error.show_error(
                        "Generation Status Unknown",
                        "Progress updates stopped arriving from the backend.",
                        Some(e),
                    ),
                    ProgressOutcome::Running | ProgressOutcome::Ignored => {}
                }
            }

            TaskResult::Preview(result) => match result {
                Ok(preview) => self.generation.set_preview(preview),
                Err(e) => tracing::warn!("Preview failed: {e}"),
            },

            TaskResult::DownloadReady(result) => match result {
                Ok(info) => self.generation.set_download(info),
                Err(e) => self.modals.error.show_error(
                    "Download Error",
                    "The finished manuscript is not available.",
                    Some(e),
                ),
            },

            TaskResult::Downloaded(result) => match result {
                Ok((path, bytes)) => {
                    tracing::info!("Saved manuscript to {} ({bytes} bytes)", path.display());
                    self.generation.set_saved(path, bytes);
                }
                Err(e) => self.modals.error.show_error(
                    "Download Error",
                    "The manuscript could not be saved.",
                    Some(e),
                ),
            },

            TaskResult::Cancelled { session_id, result } => match result {
                Ok(message) => tracing::info!("Cancel {session_id}: {message}"),
                Err(e) => self.modals.error.show_error(
                    "Cancel Error",
                    "The backend did not accept the cancellation.",
                    Some(e),
                ),
            },
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        self.modals.error.show(ctx);

        let discard = confirmation_dialog(
            &mut self.modals.discard,
            ctx,
            "Your story has unsaved changes. Discard them?",
            "Discard",
        );
        if let Some(ModalResult::Confirmed(pending)) = discard {
            self.run_pending(pending);
        }

        let brief = self.modals.brief.show(ctx, |ui, brief| {
            egui::ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut brief.as_str())
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
            });
            ui.add_space(8.0);
            action_buttons(ui, brief, "Copy to clipboard", "Close")
        });
        if let Some(ModalResult::Confirmed(text)) = brief {
            ctx.copy_text(text);
        }
    }

    fn update_backend_status(&mut self, now: Instant) {
        if self.health_check.due(now) {
            self.task_manager.check_backend();
        }
    }

    fn sync_theme_setting(&mut self, ctx: &egui::Context) {
        let dark_mode = ctx.style().visuals.dark_mode;
        if dark_mode != self.settings.dark_mode {
            self.settings.dark_mode = dark_mode;
            self.save_settings();
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("Failed to save settings: {e}");
        }
    }

    fn confirm_discard(&mut self, pending: PendingAction) {
        if self.dirty {
            self.modals.discard.open_with(pending);
        } else {
            self.run_pending(pending);
        }
    }

    fn run_pending(&mut self, pending: PendingAction) {
        match pending {
            PendingAction::NewStory => {
                self.form.reset();
                self.draft_path = None;
                self.dirty = false;
            }
            PendingAction::OpenDraft => self.open_draft(),
        }
    }

    fn draft_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("Story draft", &[persistence::DRAFT_EXTENSION]);
        match &self.settings.last_draft_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn open_draft(&mut self) {
        let Some(path) = self.draft_dialog().pick_file() else {
            return;
        };

        match persistence::load_draft(&path) {
            Ok(profile) => {
                self.form.load(profile);
                self.dirty = false;
                self.remember_draft(path);
            }
            Err(e) => self.modals.error.show_error(
                "Open Error",
                format!("{} could not be opened.", path.display()),
                Some(e.to_string()),
            ),
        }
    }

    fn save_draft_as(&mut self) {
        let name = self.draft_name().unwrap_or_else(|| DEFAULT_DRAFT_NAME.to_string());
        if let Some(path) = self.draft_dialog().set_file_name(name).save_file() {
            self.save_draft_to(path);
        }
    }

    fn save_draft_to(&mut self, path: PathBuf) {
        match persistence::save_draft(self.form.profile(), &path) {
            Ok(()) => {
                self.dirty = false;
                self.remember_draft(path);
            }
            Err(e) => self.modals.error.show_error(
                "Save Error",
                format!("The draft could not be written to {}.", path.display()),
                Some(e.to_string()),
            ),
        }
    }

    fn remember_draft(&mut self, path: PathBuf) {
        self.settings.remember_draft_path(&path);
        self.draft_path = Some(path);
        self.save_settings();
    }

    fn generate(&mut self) {
        // The overlay stays up from submission until `GenerationStarted` arrives.
        if self.generation.is_running() || self.message_overlay.is_active() {
            return;
        }

        let missing = self.form.profile().missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            self.modals.error.show_error(
                "Story Incomplete",
                format!("Fill in these fields first: {}.", names.join(", ")),
                None::<String>,
            );
            return;
        }

        self.message_overlay.set_message("Sending your story to the writers…");
        self.task_manager.start_generation(self.form.profile().clone());
    }

    fn save_document(&mut self) {
        let Some(session) = self.generation.session() else {
            return;
        };
        let Some(info) = &session.download else {
            return;
        };

        let path = rfd::FileDialog::new()
            .add_filter("Word document", &["docx"])
            .set_file_name(&info.file_name)
            .save_file();
        if let Some(path) = path {
            self.task_manager.download(session.id.clone(), path);
        }
    }
}
