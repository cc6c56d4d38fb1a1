use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The host has no speech recognition capability; no session was created
    #[error("speech recognition is not available in this environment")]
    UnsupportedCapability,
}
