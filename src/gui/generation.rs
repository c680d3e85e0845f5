use std::{
    path::PathBuf,
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui;

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    theme::Theme,
};
use crate::{
    api::{
        types::{
            AgentState,
            GenerateResponse,
            PreviewResponse,
        },
        DownloadInfo,
        GenerationPhase,
        ProgressResponse,
    },
    core::utils::{
        format_thousands,
        Interval,
    },
};

pub const PROGRESS_POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_FAILURES: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressOutcome {
    /// Response for a session that is no longer shown.
    Ignored,
    Running,
    Finished(GenerationPhase),
    /// Too many polls in a row failed; polling stops.
    Lost(String),
}

/// One backend generation run, from submission until the user closes it.
pub struct Session {
    pub id: String,
    pub estimated_minutes: u32,
    pub progress: Option<ProgressResponse>,
    pub preview: Option<PreviewResponse>,
    pub download: Option<DownloadInfo>,
    pub saved: Option<(PathBuf, u64)>,
    pub cancel_requested: bool,
    last_error: Option<String>,
    failures: u32,
    finished: bool,
    poll_in_flight: bool,
    poll: Interval,
    selected_chapter: usize,
}

impl Session {
    fn new(response: &GenerateResponse) -> Self {
        Self {
            id: response.session_id.clone(),
            estimated_minutes: response.estimated_time_minutes,
            progress: None,
            preview: None,
            download: None,
            saved: None,
            cancel_requested: false,
            last_error: None,
            failures: 0,
            finished: false,
            poll_in_flight: false,
            poll: Interval::new(PROGRESS_POLL_INTERVAL),
            selected_chapter: 0,
        }
    }

    pub fn phase(&self) -> GenerationPhase {
        self.progress.as_ref().map_or(GenerationPhase::Initialized, |p| p.current_phase)
    }

    pub fn is_running(&self) -> bool {
        !self.finished
    }
}

#[derive(Default)]
pub struct GenerationView {
    session: Option<Session>,
}

impl GenerationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, response: &GenerateResponse) {
        tracing::info!("Generation session {} started", response.session_id);
        self.session = Some(Session::new(response));
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.session.as_mut().filter(|s| s.id == session_id)
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_running)
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    /// Session id to poll now, if a poll is due and none is outstanding.
    pub fn take_poll(&mut self, now: Instant) -> Option<String> {
        let session = self.session.as_mut().filter(|s| s.is_running() && !s.poll_in_flight)?;
        if !session.poll.due(now) {
            return None;
        }
        session.poll_in_flight = true;
        Some(session.id.clone())
    }

    /// How long until the next poll should be drawn, while a session runs.
    pub fn repaint_after(&self, now: Instant) -> Option<Duration> {
        self.session.as_ref().filter(|s| s.is_running()).map(|s| s.poll.remaining(now))
    }

    pub fn apply_progress(
        &mut self,
        session_id: &str,
        result: Result<ProgressResponse, String>,
    ) -> ProgressOutcome {
        let Some(session) = self.session_mut(session_id) else {
            return ProgressOutcome::Ignored;
        };
        session.poll_in_flight = false;
        if session.finished {
            return ProgressOutcome::Ignored;
        }

        match result {
            Ok(progress) => {
                session.failures = 0;
                session.last_error = None;
                let phase = progress.current_phase;
                session.progress = Some(progress);
                if phase.is_terminal() {
                    session.finished = true;
                    ProgressOutcome::Finished(phase)
                } else {
                    ProgressOutcome::Running
                }
            }
            Err(e) => {
                session.failures += 1;
                tracing::warn!("Progress poll {} failed: {e}", session.failures);
                if session.failures >= MAX_POLL_FAILURES {
                    session.finished = true;
                    session.last_error = Some(format!("Lost contact with the backend: {e}"));
                    ProgressOutcome::Lost(e)
                } else {
                    session.last_error = Some(e);
                    ProgressOutcome::Running
                }
            }
        }
    }

    pub fn set_preview(&mut self, preview: PreviewResponse) {
        if let Some(session) = self.session_mut(&preview.session_id) {
            session.selected_chapter =
                session.selected_chapter.min(preview.chapters.len().saturating_sub(1));
            session.preview = Some(preview);
        }
    }

    pub fn set_download(&mut self, info: DownloadInfo) {
        if let Some(session) = self.session_mut(&info.session_id) {
            session.download = Some(info);
        }
    }

    pub fn set_saved(&mut self, path: PathBuf, bytes: u64) {
        if let Some(session) = self.session.as_mut() {
            session.saved = Some((path, bytes));
        }
    }

    pub fn mark_cancel_requested(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_requested = true;
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme, actions: &mut ActionQueue) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        egui::Window::new("Book Generation")
            .id(egui::Id::new("generation_window"))
            .default_size([540.0, 560.0])
            .collapsible(true)
            .resizable(true)
            .show(ctx, |ui| {
                progress_block(ui, theme, session);
                ui.separator();
                agents_block(ui, session);
                result_block(ui, theme, session, actions);
                preview_block(ui, session);

                ui.separator();
                ui.horizontal(|ui| {
                    if session.is_running() {
                        let cancel = ui.add_enabled(
                            !session.cancel_requested,
                            egui::Button::new("Cancel generation"),
                        );
                        if cancel.clicked() {
                            actions.push(UiAction::CancelGeneration);
                        }
                    } else if ui.button("Close").clicked() {
                        actions.push(UiAction::CloseGeneration);
                    }
                    if ui.button("Refresh preview").clicked() {
                        actions.push(UiAction::RefreshPreview);
                    }
                });
            });
    }
}

fn progress_block(ui: &mut egui::Ui, theme: &Theme, session: &Session) {
    let phase = session.phase();
    let fraction = session.progress.as_ref().map_or(0.0, |p| p.progress / 100.0).clamp(0.0, 1.0);

    ui.heading(theme.heading(ui.ctx(), phase.label()));
    ui.add(
        egui::ProgressBar::new(fraction)
            .fill(theme.progress_fill(ui.ctx(), fraction))
            .show_percentage()
            .animate(session.is_running()),
    );

    match session.progress.as_ref().and_then(|p| p.estimated_completion_time) {
        Some(eta) if session.is_running() => {
            ui.weak(format!("Expected to finish around {}", eta.format("%H:%M")));
        }
        None if session.is_running() => {
            ui.weak(format!("Estimated time: about {} minutes", session.estimated_minutes));
        }
        _ => {}
    }

    if session.cancel_requested && session.is_running() {
        ui.weak("Cancelling…");
    }

    if let Some(error) = session.progress.as_ref().and_then(ProgressResponse::error) {
        ui.colored_label(theme.red(ui.ctx()), error);
    }
    if let Some(error) = &session.last_error {
        ui.colored_label(theme.amber(ui.ctx()), error);
    }
}

fn agents_block(ui: &mut egui::Ui, session: &Session) {
    let Some(progress) = &session.progress else {
        return;
    };
    if progress.agent_statuses.is_empty() {
        return;
    }

    ui.collapsing("Agents", |ui| {
        egui::Grid::new("agent_statuses").num_columns(3).striped(true).show(ui, |ui| {
            for agent in &progress.agent_statuses {
                ui.label(&agent.agent_name);
                ui.label(match agent.status {
                    AgentState::Ready => "ready",
                    AgentState::Working => "working",
                    AgentState::Completed => "done",
                    AgentState::Error => "error",
                    AgentState::Unknown => "?",
                });
                let message = agent.message.as_deref().unwrap_or_default();
                ui.add(
                    egui::ProgressBar::new((agent.progress / 100.0).clamp(0.0, 1.0))
                        .desired_width(160.0)
                        .text(message),
                );
                ui.end_row();
            }
        });
    });
}

fn result_block(ui: &mut egui::Ui, theme: &Theme, session: &Session, actions: &mut ActionQueue) {
    if session.phase() != GenerationPhase::Completed {
        return;
    }

    ui.separator();
    match &session.download {
        Some(info) => {
            ui.label(format!(
                "{} is ready: {} chapters, {} words.",
                info.file_name,
                info.total_chapters,
                format_thousands(info.total_words)
            ));
        }
        None => {
            ui.weak("Preparing the manuscript…");
        }
    }

    ui.horizontal(|ui| {
        let save = ui.add_enabled(session.download.is_some(), egui::Button::new("💾 Save .docx…"));
        if save.clicked() {
            actions.push(UiAction::SaveDocument);
        }
        if let Some((path, bytes)) = &session.saved {
            ui.colored_label(
                theme.green(ui.ctx()),
                format!("Saved {} ({} bytes)", path.display(), format_thousands(*bytes)),
            );
        }
    });
}

fn preview_block(ui: &mut egui::Ui, session: &mut Session) {
    let Some(preview) = &session.preview else {
        return;
    };
    if preview.chapters.is_empty() {
        ui.weak("No chapters written yet.");
        return;
    }

    ui.separator();
    ui.label(format!(
        "{} chapters so far, {} words",
        preview.chapters.len(),
        format_thousands(preview.total_word_count)
    ));

    let selected = session.selected_chapter.min(preview.chapters.len() - 1);
    let mut choice = selected;
    egui::ComboBox::from_id_salt("preview_chapter")
        .selected_text(chapter_title(preview, selected))
        .width(300.0)
        .show_ui(ui, |ui| {
            for index in 0..preview.chapters.len() {
                ui.selectable_value(&mut choice, index, chapter_title(preview, index));
            }
        });

    let chapter = &preview.chapters[choice];
    ui.weak(format!("{} words", format_thousands(chapter.word_count as u64)));
    egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
        ui.label(&chapter.content);
    });

    session.selected_chapter = choice;
}

fn chapter_title(preview: &PreviewResponse, index: usize) -> String {
    let chapter = &preview.chapters[index];
    format!("Chapter {}: {}", chapter.chapter_number, chapter.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> GenerationView {
        let mut view = GenerationView::new();
        view.start(&GenerateResponse {
            session_id: "abc".to_string(),
            message: "Story generation started".to_string(),
            estimated_time_minutes: 20,
        });
        view
    }

    fn progress(phase: GenerationPhase, percent: f32) -> ProgressResponse {
        ProgressResponse {
            session_id: "abc".to_string(),
            current_phase: phase,
            progress: percent,
            agent_statuses: Vec::new(),
            estimated_completion_time: None,
            error_message: None,
        }
    }

    #[test]
    fn one_poll_in_flight_at_a_time() {
        let mut view = started();
        let now = Instant::now();

        assert_eq!(view.take_poll(now).as_deref(), Some("abc"));
        assert_eq!(view.take_poll(now + PROGRESS_POLL_INTERVAL * 3), None);

        let outcome =
            view.apply_progress("abc", Ok(progress(GenerationPhase::Worldbuilding, 15.0)));
        assert_eq!(outcome, ProgressOutcome::Running);
        assert_eq!(view.take_poll(now + Duration::from_millis(500)), None);
        assert!(view.take_poll(now + PROGRESS_POLL_INTERVAL).is_some());
    }

    #[test]
    fn terminal_phase_stops_polling() {
        let mut view = started();
        let now = Instant::now();
        view.take_poll(now);

        let outcome = view.apply_progress("abc", Ok(progress(GenerationPhase::Completed, 100.0)));
        assert_eq!(outcome, ProgressOutcome::Finished(GenerationPhase::Completed));
        assert!(!view.is_running());
        assert_eq!(view.take_poll(now + PROGRESS_POLL_INTERVAL * 2), None);
        assert_eq!(view.repaint_after(now), None);
    }

    #[test]
    fn responses_for_other_sessions_are_ignored() {
        let mut view = started();
        let outcome = view.apply_progress("old", Ok(progress(GenerationPhase::Error, 0.0)));
        assert_eq!(outcome, ProgressOutcome::Ignored);
        assert!(view.is_running());
    }

    #[test]
    fn repeated_failures_lose_the_session() {
        let mut view = started();
        for attempt in 1..MAX_POLL_FAILURES {
            let outcome = view.apply_progress("abc", Err(format!("timeout {attempt}")));
            assert_eq!(outcome, ProgressOutcome::Running);
        }
        let outcome = view.apply_progress("abc", Err("Session not found".to_string()));
        assert_eq!(outcome, ProgressOutcome::Lost("Session not found".to_string()));
        assert!(!view.is_running());
    }

    #[test]
    fn a_success_resets_the_failure_count() {
        let mut view = started();
        for _ in 1..MAX_POLL_FAILURES {
            view.apply_progress("abc", Err("timeout".to_string()));
        }
        view.apply_progress("abc", Ok(progress(GenerationPhase::StoryGeneration, 50.0)));
        let outcome = view.apply_progress("abc", Err("timeout".to_string()));
        assert_eq!(outcome, ProgressOutcome::Running);
    }
}
