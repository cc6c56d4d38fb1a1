use crate::runtime::DictationHandle;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Command channel into the dictation runtime
    pub dictation: DictationHandle,
}

impl AppState {
    pub fn new(dictation: DictationHandle) -> Self {
        Self { dictation }
    }
}
