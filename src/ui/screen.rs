use ratatui::Frame;

use crate::{
    ui::{picker::render_picker, practice::render_practice},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Language and level selection
pub struct PickerScreen;

impl Screen for PickerScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_picker(app, f);
    }
}

/// Prompt, answer input and feedback for the live session
pub struct PracticeScreen;

impl Screen for PracticeScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_practice(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Picking => Box::new(PickerScreen),
        AppState::Practicing => Box::new(PracticeScreen),
    }
}
