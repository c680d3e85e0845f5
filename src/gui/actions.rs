use crate::core::FormAction;

// Widgets only read the form; everything they want changed is queued here and
// applied by the app once the frame is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    // Form edits
    Form(FormAction),

    // Drafts
    NewStory,
    OpenDraft,
    SaveDraft,
    SaveDraftAs,

    // Generation session
    Generate,
    CancelGeneration,
    RefreshPreview,
    SaveDocument,
    CloseGeneration,

    // Misc
    ShowBrief,
    CheckBackend,
    Quit,
}

impl From<FormAction> for UiAction {
    fn from(action: FormAction) -> Self {
        UiAction::Form(action)
    }
}

pub struct ActionQueue {
    actions: Vec<UiAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: impl Into<UiAction>) {
        self.actions.push(action.into());
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, UiAction> {
        self.actions.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sections::SectionKey;

    #[test]
    fn drains_in_push_order() {
        let mut queue = ActionQueue::new();
        queue.push(FormAction::AddCharacter);
        queue.push(UiAction::SaveDraft);
        queue.push(FormAction::ToggleSection(SectionKey::Characters));

        let drained: Vec<UiAction> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                UiAction::Form(FormAction::AddCharacter),
                UiAction::SaveDraft,
                UiAction::Form(FormAction::ToggleSection(SectionKey::Characters)),
            ]
        );
        assert!(queue.is_empty());
    }
}
