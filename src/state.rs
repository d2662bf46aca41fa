use crate::services::lifecycle::PasteManager;

#[derive(Clone)]
pub struct AppState {
    pub pastes: PasteManager,
    pub test_mode: bool,
}
